use serde::{Deserialize, Serialize};

/// One application entry of the published catalog.
///
/// Field names on the wire follow the catalog resource (`nome`, `descricao`,
/// `icone`, `link_apk`); records are never mutated after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "icone")]
    pub icon: String,
    #[serde(rename = "link_apk")]
    pub apk_link: String,
}

pub fn find_record(records: &[ApplicationRecord], id: i64) -> Option<&ApplicationRecord> {
    records.iter().find(|record| record.id == id)
}

/// Records whose id is in `favorite_ids`, in catalog order.
///
/// Ids with no matching record are dropped without complaint.
pub fn filter_favorites(records: &[ApplicationRecord], favorite_ids: &[i64]) -> Vec<ApplicationRecord> {
    records
        .iter()
        .filter(|record| favorite_ids.contains(&record.id))
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_record(id: i64) -> ApplicationRecord {
    ApplicationRecord {
        id,
        name: format!("App {id}"),
        description: format!("Description of app {id}"),
        icon: format!("https://cdn.example.com/icons/{id}.png"),
        apk_link: format!("https://cdn.example.com/apk/{id}.apk"),
    }
}
