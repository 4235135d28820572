//! 挿入順を保つID集合
//!
//! ArXiv検索結果の選択と論文管理モーダルの選択で使う。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加（既にあれば何もしない）。追加したらtrue
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// 削除。あればtrue
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|x| x != id);
        self.ids.len() != before
    }

    /// 選択を反転し、反転後に選択状態ならtrue
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.insert(id)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// `keep` に含まれないIDを落とす
    pub fn retain_known<'a, I>(&mut self, keep: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let known: Vec<&str> = keep.into_iter().collect();
        self.ids.retain(|id| known.contains(&id.as_str()));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dedup_keeps_order() {
        let mut sel = Selection::new();
        assert!(sel.insert("b"));
        assert!(sel.insert("a"));
        assert!(!sel.insert("b"));
        assert_eq!(sel.to_vec(), vec!["b", "a"]);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut sel = Selection::new();
        sel.insert("x");
        let before = sel.clone();

        assert!(sel.toggle("y"));
        assert!(!sel.toggle("y"));
        assert_eq!(sel, before);
    }

    #[test]
    fn test_retain_known() {
        let mut sel = Selection::new();
        sel.insert("a");
        sel.insert("b");
        sel.insert("c");
        sel.retain_known(["c", "a", "z"]);
        assert_eq!(sel.to_vec(), vec!["a", "c"]);
    }
}
