//! Standalone screen page around a rendered fragment.

use super::html::escape_html;
use super::{RenderedReport, Theme};

/// Font stack shared by screen and print output.
pub const FONT_STACK: &str =
    "'Malgun Gothic', '맑은 고딕', 'Apple SD Gothic Neo', 'Noto Sans KR', sans-serif";

const BASE_CSS: &str = "body{margin:0;padding:2em;font-size:11pt;line-height:1.6}\
.report{max-width:210mm;margin:0 auto;padding:2cm;box-sizing:border-box}";

const LIGHT_CSS: &str = "body{background:#f1f5f9}\
.report{background:#fff;color:#000}";

// Fragment styles are inline, so the dark palette has to override them.
const DARK_CSS: &str = "body{background:#0f172a}\
.report{background:#1e293b;color:#e2e8f0}\
.report th,.report td{border-color:#94a3b8 !important}\
.report th[scope=row]{background:#334155 !important}";

// Printing from the screen page always comes out light.
const PRINT_CSS: &str = "@media print{body{background:#fff;padding:0}\
.report{background:#fff !important;color:#000 !important;padding:0;max-width:none}\
.report th,.report td{border-color:#000 !important}\
.report th[scope=row]{background:#f1f5f9 !important}}";

/// Wrap a report fragment in a complete HTML page for on-screen viewing.
pub fn screen_page(report: &RenderedReport, theme: Theme) -> String {
    let title = report.document().title().unwrap_or("보고서");
    let theme_css = match theme {
        Theme::Light => LIGHT_CSS,
        Theme::Dark => DARK_CSS,
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"ko\" class=\"{theme}\">\n<head>\n\
         <meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>body{{font-family:{fonts}}}{base}{theme_css}{print}</style>\n\
         </head>\n<body>\n<div id=\"report-content\" class=\"report {theme}\">\n{fragment}</div>\n\
         </body>\n</html>\n",
        theme = theme.as_str(),
        title = escape_html(title),
        fonts = FONT_STACK,
        base = BASE_CSS,
        theme_css = theme_css,
        print = PRINT_CSS,
        fragment = report.fragment(),
    )
}
