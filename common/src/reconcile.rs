//! 実際の処理者と推薦領導の照合ルール

use crate::identity::AccountNameMap;

/// 照合フラグを計算（一致なら 1、それ以外 0）
///
/// 両者を前後空白除去したうえで完全一致し、かつその名前が正規の表示名に
/// 含まれる場合のみ一致とする。大文字小文字・同義語の正規化は行わない。
pub fn reconcile(actual_handler: &str, recommended_name: &str, names: &AccountNameMap) -> u8 {
    let actual = actual_handler.trim();
    let recommended = recommended_name.trim();

    if actual == recommended && names.is_canonical(actual) {
        1
    } else {
        0
    }
}
