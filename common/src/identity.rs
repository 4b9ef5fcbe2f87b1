//! 領導アカウント → 表示名の解決
//!
//! 推薦APIが返すアカウントを、照合対象となる正規の表示名へ変換する。
//! 未知のアカウントは空文字に解決される（エラーではない）。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// アカウント → 表示名のマッピング
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct AccountNameMap {
    entries: BTreeMap<String, String>,
}

impl AccountNameMap {
    /// 任意のマッピングから作成
    ///
    /// 空のマッピング、空のアカウント・表示名はエラー。
    pub fn new<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (account, name) in entries {
            let account = account.into().trim().to_string();
            let name = name.into().trim().to_string();
            if account.is_empty() || name.is_empty() {
                return Err(Error::Mapping(format!(
                    "アカウントと表示名は空にできません: '{}' → '{}'",
                    account, name
                )));
            }
            map.insert(account, name);
        }

        if map.is_empty() {
            return Err(Error::Mapping("領導マッピングが空です".into()));
        }

        Ok(Self { entries: map })
    }

    /// アカウントを表示名へ解決（完全一致のみ、未知・空は空文字）
    pub fn resolve_name(&self, account: &str) -> String {
        self.entries.get(account).cloned().unwrap_or_default()
    }

    /// 照合対象となる正規の表示名
    pub fn canonical_names(&self) -> BTreeSet<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    pub fn is_canonical(&self, name: &str) -> bool {
        !name.is_empty() && self.entries.values().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, n)| (a.as_str(), n.as_str()))
    }
}

impl TryFrom<BTreeMap<String, String>> for AccountNameMap {
    type Error = Error;

    fn try_from(entries: BTreeMap<String, String>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<AccountNameMap> for BTreeMap<String, String> {
    fn from(map: AccountNameMap) -> Self {
        map.entries
    }
}

impl Default for AccountNameMap {
    /// 組み込みの領導3名
    fn default() -> Self {
        let entries = [
            ("zb1", "赵斌"),
            ("zhangyaohua1", "张耀华"),
            ("xuhuiyun", "许慧云"),
        ]
        .into_iter()
        .map(|(a, n)| (a.to_string(), n.to_string()))
        .collect();

        Self { entries }
    }
}
