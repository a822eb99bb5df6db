use sqlx::mysql::{MySqlConnection, MySqlRow};

use vinsnap_core::{Error, Result};

/// The one statement an export runs. Every wine is kept (left join); a
/// missing category name becomes `''`.
pub const WINES_SNAPSHOT_SQL: &str = r#"
SELECT
  w.SKU                         AS sku,
  w.wine_name                   AS name,
  w.unit_price                  AS price,
  w.vintage                     AS vintage,
  IFNULL(c.category_name, '')   AS category,
  w.region                      AS region,
  w.variety                     AS variety,
  w.stock                       AS stock,
  w.image_url                   AS image_url,
  w.description                 AS description,
  w.status                      AS status
FROM wines w
LEFT JOIN categories c
  ON w.category_id = c.category_id
ORDER BY w.wine_name
"#;

pub async fn fetch_wine_rows(conn: &mut MySqlConnection) -> Result<Vec<MySqlRow>> {
    sqlx::query(WINES_SNAPSHOT_SQL)
        .fetch_all(conn)
        .await
        .map_err(|err| Error::Query(err.to_string()))
}
