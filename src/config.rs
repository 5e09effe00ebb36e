//! プラグイン設定。tauri.conf.jsonの`plugins > launch-link`節をデシリアライズする。

use serde::Deserialize;

/// 起動リンクとして扱うURLスキームの一覧。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// 起動引数から拾い上げるスキーム。空のままなら引数からの取り込みは行わない。
    #[serde(default)]
    pub schemes: Vec<String>,
}

/// スキーム表記の揺れを吸収する。前後空白と`://`や`:`の残骸を落として小文字へ寄せ、
/// 空になった項目と重複は取り除く(初出を残す)。
pub(crate) fn normalize_schemes(schemes: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(schemes.len());
    for scheme in schemes {
        let scheme = scheme
            .trim()
            .trim_end_matches("://")
            .trim_end_matches(':')
            .to_ascii_lowercase();
        if !scheme.is_empty() && !normalized.contains(&scheme) {
            normalized.push(scheme);
        }
    }
    normalized
}
