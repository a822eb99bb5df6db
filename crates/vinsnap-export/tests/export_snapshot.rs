use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use vinsnap_core::{Error, FieldValue, Result, WineRecord};
use vinsnap_export::{Source, export_snapshot};

struct StaticSource {
    records: Vec<WineRecord>,
}

#[async_trait]
impl Source for StaticSource {
    fn engine(&self) -> &'static str {
        "static"
    }

    async fn fetch_wines(&mut self) -> Result<Vec<WineRecord>> {
        Ok(self.records.clone())
    }
}

struct FailingSource;

#[async_trait]
impl Source for FailingSource {
    fn engine(&self) -> &'static str {
        "failing"
    }

    async fn fetch_wines(&mut self) -> Result<Vec<WineRecord>> {
        Err(Error::Query("Table 'shop.wines' doesn't exist".to_string()))
    }
}

fn two_wines() -> Vec<WineRecord> {
    vec![
        WineRecord {
            sku: Some("WHT-002".to_string()),
            name: Some("Albarino".to_string()),
            price: FieldValue::from_decimal_str("18.50").expect("decimal"),
            vintage: FieldValue::from(2022_i64),
            category: "White".to_string(),
            region: Some("Rias Baixas".to_string()),
            variety: Some("Albarino".to_string()),
            stock: FieldValue::from(30_i64),
            image_url: Some("img/albarino.jpg".to_string()),
            description: None,
            status: FieldValue::from("active"),
        },
        WineRecord {
            sku: Some("ORP-003".to_string()),
            name: Some("Cellar Mystery".to_string()),
            price: FieldValue::from_decimal_str("9.99").expect("decimal"),
            vintage: FieldValue::Null,
            category: String::new(),
            region: None,
            variety: None,
            stock: FieldValue::from(0_i64),
            image_url: Some(String::new()),
            description: Some(String::new()),
            status: FieldValue::from("archived"),
        },
    ]
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("vinsnap_export_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}

#[tokio::test]
async fn writes_snapshot_matching_golden_file() {
    let out = temp_out_dir("golden").join("wines.json");
    let mut source = StaticSource {
        records: two_wines(),
    };

    let summary = export_snapshot(&mut source, &out).await.expect("export");

    assert_eq!(summary.rows, 2);
    assert_eq!(summary.path, out);

    let golden = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/golden/two_wines.json");
    let expected = fs::read_to_string(&golden).expect("read golden");
    let written = fs::read_to_string(&out).expect("read snapshot");
    assert_eq!(written.trim_end(), expected.trim_end());
}

#[tokio::test]
async fn empty_source_writes_empty_array() {
    let out = temp_out_dir("empty").join("wines.json");
    let mut source = StaticSource {
        records: Vec::new(),
    };

    let summary = export_snapshot(&mut source, &out).await.expect("export");

    assert_eq!(summary.rows, 0);
    assert_eq!(fs::read_to_string(&out).expect("read snapshot"), "[]");
}

#[tokio::test]
async fn repeated_exports_are_byte_identical() {
    let dir = temp_out_dir("idempotent");
    let first = dir.join("first.json");
    let second = dir.join("second.json");

    let mut source = StaticSource {
        records: two_wines(),
    };
    export_snapshot(&mut source, &first).await.expect("first export");
    export_snapshot(&mut source, &second).await.expect("second export");

    assert_eq!(
        fs::read(&first).expect("read first"),
        fs::read(&second).expect("read second")
    );
}

#[tokio::test]
async fn failed_fetch_writes_nothing() {
    let out = temp_out_dir("failed_fetch").join("wines.json");

    let err = export_snapshot(&mut FailingSource, &out)
        .await
        .expect_err("export should fail");

    assert!(matches!(err, Error::Query(_)));
    assert!(!out.exists());
}

#[tokio::test]
async fn failed_fetch_keeps_previous_snapshot() {
    let out = temp_out_dir("stale").join("wines.json");
    fs::write(&out, "[\n  {\"sku\": \"OLD\"}\n]").expect("seed previous snapshot");

    export_snapshot(&mut FailingSource, &out)
        .await
        .expect_err("export should fail");

    assert_eq!(
        fs::read_to_string(&out).expect("read snapshot"),
        "[\n  {\"sku\": \"OLD\"}\n]"
    );
}

#[tokio::test]
async fn unwritable_destination_is_an_io_error() {
    let dir = temp_out_dir("unwritable");
    let blocker = dir.join("not_a_dir");
    fs::write(&blocker, "file").expect("create blocking file");
    let out = blocker.join("wines.json");

    let mut source = StaticSource {
        records: two_wines(),
    };
    let err = export_snapshot(&mut source, &out)
        .await
        .expect_err("export should fail");

    assert!(matches!(err, Error::Io { .. }));
}
