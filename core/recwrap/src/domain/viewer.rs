//! ビューワー HTML（固定テンプレート）
//!
//! アーカイブした動画を相対名で埋め込む最小の HTML。外部リソースを読み込めないよう
//! 制限付き CSP を宣言する。互換性のため同内容の meta タグを 3 種類出力する。

/// ビューワー HTML を生成する（単一の `<video controls>` 要素）
pub fn viewer_html(title: &str, video_file: &str) -> String {
    format!(
        "<html>\n\
         <head>\n\
         <meta http-equiv=\"Content-Security-Policy\" content=\"default-src 'self'; script-src 'self'\">\n\
         <meta http-equiv=\"X-Content-Security-Policy\" content=\"default-src 'self'; script-src 'self'\">\n\
         <meta http-equiv=\"X-WebKit-CSP\" content=\"default-src 'self'; script-src 'self'\">\n\
         <title>{title}</title>\n\
         </head>\n\
         \n\
         <body>\n\
         <video src=\"{video_file}\" controls>\n\
         </video>\n\
         </body>\n\
         \n\
         </html>"
    )
}
