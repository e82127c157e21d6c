//! キャプチャコマンドの解決（純粋変換）
//!
//! ユーザーのコマンドテンプレート（空ならグローバル既定）にマクロ展開を適用し、
//! 引用符を解釈してトークン化した上で、解決済み出力パスを最終引数として付加する。
//! 副作用なし。マクロの値自体は BuildEnv ポートが外から供給する。

use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// 解決済みコマンド（CaptureSpec の材料）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    /// トークン化済み argv（最終要素が出力パス）
    pub argv: Vec<String>,
    /// マクロ展開済みのコマンド文字列（出力パスなし）
    pub display_command: String,
    pub output_path: PathBuf,
}

fn macro_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Za-z0-9_]+)\}").expect("macro regex"))
}

/// `${KEY}` 形式のマクロを全て置換する。マップに無いキーはそのまま残す。
pub fn substitute_macros(template: &str, macros: &BTreeMap<String, String>) -> String {
    macro_re()
        .replace_all(template, |caps: &regex::Captures| {
            let key = &caps[1];
            macros
                .get(key)
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// コマンド文字列を引用符を解釈して argv に分割する
///
/// 単引用符・二重引用符で囲まれた区間は空白で分割しない。二重引用符内と裸の位置では
/// バックスラッシュが次の 1 文字をエスケープする。閉じられていない引用符は文字列末尾で閉じる。
pub fn tokenize(command: &str) -> Vec<String> {
    #[derive(PartialEq)]
    enum Quote {
        None,
        Single,
        Double,
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote = Quote::None;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match quote {
            Quote::Single => {
                if c == '\'' {
                    quote = Quote::None;
                } else {
                    current.push(c);
                }
            }
            Quote::Double => match c {
                '"' => quote = Quote::None,
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                _ => current.push(c),
            },
            Quote::None => match c {
                '\'' => {
                    quote = Quote::Single;
                    in_token = true;
                }
                '"' => {
                    quote = Quote::Double;
                    in_token = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                        in_token = true;
                    }
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// 出力パステンプレートを解決する
///
/// 展開結果が空、または未解決マクロの "null" マーカーを含む場合は
/// カレントディレクトリ相対の `<ビルド番号>.mp4` にフォールバックする。
pub fn resolve_output_path(
    template: &str,
    macros: &BTreeMap<String, String>,
    build_number: &str,
) -> PathBuf {
    let resolved = substitute_macros(template, macros);
    if resolved.is_empty() || resolved.to_lowercase().contains("null") {
        return PathBuf::from(format!("{}.mp4", build_number));
    }
    PathBuf::from(resolved)
}

/// キャプチャコマンド全体を解決する
///
/// user_command が空ならグローバル既定 default_command を使う。出力パスは
/// トークン化の後に最終引数として付加する（パス中の空白で壊れないように）。
pub fn resolve(
    user_command: &str,
    default_command: &str,
    output_template: &str,
    macros: &BTreeMap<String, String>,
    build_number: &str,
) -> ResolvedCommand {
    let template = if user_command.trim().is_empty() {
        default_command
    } else {
        user_command
    };
    let display_command = substitute_macros(template, macros);
    let output_path = resolve_output_path(output_template, macros, build_number);
    let mut argv = tokenize(&display_command);
    argv.push(output_path.to_string_lossy().into_owned());
    ResolvedCommand {
        argv,
        display_command,
        output_path,
    }
}
