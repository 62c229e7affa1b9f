//! End-to-end purchase against a catalog file on disk.

use std::sync::Arc;

use shop_catalog::{Catalog, DirectoryDescriptions, JsonCatalogStore};
use shop_core::{
    ChatId, InboundEvent, MediaKind, MemorySessionStore, MessageId, OutboundCall,
    RecordingTransport,
};
use storefront::{Controller, ShopConfig};

const ADMIN: ChatId = ChatId(900);
const BUYER: ChatId = ChatId(42);

fn press(from: ChatId, data: &str) -> InboundEvent {
    InboundEvent::Callback {
        id: "cb".into(),
        chat: from,
        from,
        data: data.into(),
    }
}

fn read_catalog(path: &std::path::Path) -> Catalog {
    Catalog::from_json(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_chess_purchase() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(
        &catalog_path,
        r#"{"Games":{"Chess":{"price":10,"stock":["KEY1","KEY2"]}}}"#,
    )
    .unwrap();
    let descriptions = dir.path().join("descriptions");
    std::fs::create_dir(&descriptions).unwrap();
    std::fs::write(descriptions.join("Chess.txt"), "The royal game.").unwrap();

    let transport = Arc::new(RecordingTransport::new());
    let mut config = ShopConfig::new(ADMIN);
    config.catalog_path.clone_from(&catalog_path);
    config.payments.wallet_code = "WALLET-77".into();

    let controller = Controller::new(
        Arc::new(JsonCatalogStore::new(&catalog_path)),
        Arc::new(MemorySessionStore::new()),
        Arc::new(DirectoryDescriptions::new(&descriptions)),
        transport.clone(),
        config,
    );

    controller
        .handle(InboundEvent::from_text(BUYER, BUYER, "/start"))
        .await
        .unwrap();
    controller.handle(press(BUYER, "cat:Games")).await.unwrap();
    let (_, keyboard) = transport.last_text_to(BUYER).await.unwrap();
    assert_eq!(keyboard.unwrap().callback_data(), vec!["prod:Chess", "home"]);

    controller.handle(press(BUYER, "prod:Chess")).await.unwrap();
    let (product_page, keyboard) = transport.last_text_to(BUYER).await.unwrap();
    assert!(product_page.contains("The royal game."));
    assert!(product_page.contains("Price: 10"));
    assert_eq!(
        keyboard.unwrap().callback_data(),
        vec!["pay:bank", "pay:wallet", "pay:crypto", "home"]
    );

    controller.handle(press(BUYER, "pay:wallet")).await.unwrap();
    let (instructions, _) = transport.last_text_to(BUYER).await.unwrap();
    assert!(instructions.contains("WALLET-77"));

    controller
        .handle(InboundEvent::Media {
            chat: BUYER,
            from: BUYER,
            message_id: MessageId(314),
            kind: MediaKind::Photo,
        })
        .await
        .unwrap();

    assert_eq!(transport.forwards_to(ADMIN).await, vec![(BUYER, MessageId(314))]);
    let (_, approve) = transport.last_text_to(ADMIN).await.unwrap();
    let approve = approve.unwrap();
    assert_eq!(approve.callback_data(), vec!["approve:42"]);

    // nothing has been written yet
    assert_eq!(
        read_catalog(&catalog_path).product("Games", "Chess").unwrap().stock,
        vec!["KEY1".to_string(), "KEY2".to_string()]
    );

    controller.handle(press(ADMIN, approve.callback_data()[0])).await.unwrap();

    let (delivery, _) = transport.last_text_to(BUYER).await.unwrap();
    assert!(delivery.contains("KEY1"));
    assert!(!delivery.contains("KEY2"));

    let on_disk = read_catalog(&catalog_path);
    assert_eq!(
        on_disk.product("Games", "Chess").unwrap().stock,
        vec!["KEY2".to_string()]
    );

    // the key never reaches the admin chat
    let leaked = transport.calls().await.into_iter().any(|call| match call {
        OutboundCall::Text { chat, text, .. } => chat == ADMIN && text.contains("KEY1"),
        _ => false,
    });
    assert!(!leaked);
}

#[tokio::test]
async fn test_out_of_stock_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("catalog.json");
    let original = r#"{"Games":{"Chess":{"price":10,"stock":[]}}}"#;
    std::fs::write(&catalog_path, original).unwrap();

    let transport = Arc::new(RecordingTransport::new());
    let controller = Controller::new(
        Arc::new(JsonCatalogStore::new(&catalog_path)),
        Arc::new(MemorySessionStore::new()),
        Arc::new(DirectoryDescriptions::new(dir.path())),
        transport.clone(),
        ShopConfig::new(ADMIN),
    );

    controller.handle(press(BUYER, "cat:Games")).await.unwrap();
    controller.handle(press(BUYER, "prod:Chess")).await.unwrap();
    controller.handle(press(ADMIN, "approve:42")).await.unwrap();

    let (text, _) = transport.last_text_to(BUYER).await.unwrap();
    assert!(text.contains("out of stock"));
    assert_eq!(std::fs::read_to_string(&catalog_path).unwrap(), original);
}
