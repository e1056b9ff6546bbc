use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 法條單位：段落（§5）或段落下的款（§5, ods. 2）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provision {
    pub id: String,
    pub text: String,
}

/// 合約條款，保留原文件順序
pub type Clause = String;

/// 依首次出現順序保存的法條對照表。重複的識別碼會覆寫先前的內容（後者勝出）
#[derive(Debug, Clone, Default)]
pub struct ProvisionMap {
    entries: Vec<Provision>,
    index: HashMap<String, usize>,
}

impl ProvisionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆寫，回傳是否覆寫了既有條目
    pub fn insert(&mut self, id: String, text: String) -> bool {
        if let Some(&pos) = self.index.get(&id) {
            self.entries[pos].text = text;
            true
        } else {
            self.index.insert(id.clone(), self.entries.len());
            self.entries.push(Provision { id, text });
            false
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.index
            .get(id)
            .map(|&pos| self.entries[pos].text.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Provision> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|p| p.id.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProvisionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ProvisionMap::new();
        for (id, text) in iter {
            map.insert(id.into(), text.into());
        }
        map
    }
}

/// 單一「法條 × 條款」比對的結果，建立後不再修改。
/// 欄位名稱沿用既有的 `vysledky.json` 輸出格式。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    #[serde(rename = "zakon")]
    pub provision_id: String,
    #[serde(rename = "cast_zmluvy")]
    pub clause: String,
    #[serde(rename = "vysvetlenie")]
    pub explanation: String,
    #[serde(rename = "sulad")]
    pub compliant: bool,
}

/// 分類器對單次模型回覆的判定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub compliant: bool,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_overwrites_in_place() {
        let mut map = ProvisionMap::new();
        assert!(!map.insert("§3".to_string(), "first".to_string()));
        assert!(!map.insert("§5".to_string(), "other".to_string()));
        assert!(map.insert("§3".to_string(), "second".to_string()));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("§3"), Some("second"));
        assert_eq!(map.ids().collect::<Vec<_>>(), vec!["§3", "§5"]);
    }

    #[test]
    fn test_result_serializes_with_existing_keys() {
        let result = ComparisonResult {
            provision_id: "§5, ods. 1".to_string(),
            clause: "Správca je povinný".to_string(),
            explanation: "ÁNO".to_string(),
            compliant: true,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["zakon"], "§5, ods. 1");
        assert_eq!(json["cast_zmluvy"], "Správca je povinný");
        assert_eq!(json["vysvetlenie"], "ÁNO");
        assert_eq!(json["sulad"], true);
    }
}
