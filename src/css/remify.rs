//! Pixel fallbacks for rem units.
//!
//! Inserts a `px` duplicate declaration before every declaration carrying
//! a `rem` value (16 px per rem root size), so browsers without rem
//! support fall back to the pixel value and everything newer takes the
//! rem one via the cascade.
//!
//! Runs on the printed expanded artifact, after consolidation; callers
//! patch the source map with the returned line indices.

use std::sync::LazyLock;

use regex::Regex;

// ASCII classes only: the regex build carries no unicode tables.

/// One declaration per line, expanded-format CSS.
static DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<indent>[ \t]*)(?P<prop>-?[A-Za-z][A-Za-z-]*)[ \t]*:[ \t]*(?P<value>[^;]+);[ \t]*$",
    )
    .expect("declaration regex")
});

/// A rem quantity inside a declaration value.
static REM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?[0-9]*\.?[0-9]+)rem(?-u:\b)").expect("rem regex"));

/// Root font size used for the conversion.
const ROOT_PX: f64 = 16.0;

/// Remify result: transformed CSS plus the output line indices (0-based)
/// of every inserted fallback line, in ascending order.
pub struct Remified {
    pub css: String,
    pub inserted: Vec<usize>,
}

/// Insert px fallback declarations before rem declarations.
pub fn remify(css: &str) -> Remified {
    let mut out: Vec<String> = Vec::new();
    let mut inserted = Vec::new();

    for line in css.lines() {
        if let Some(caps) = DECL.captures(line) {
            let prop = &caps["prop"];
            let value = &caps["value"];
            if !prop.starts_with("--") && REM.is_match(value) {
                let fallback = REM.replace_all(value, |c: &regex::Captures| {
                    px_value(c[1].parse::<f64>().unwrap_or(0.0))
                });
                inserted.push(out.len());
                out.push(format!("{}{}: {};", &caps["indent"], prop, fallback));
            }
        }
        out.push(line.to_string());
    }

    let mut css_out = out.join("\n");
    if css.ends_with('\n') {
        css_out.push('\n');
    }

    Remified {
        css: css_out,
        inserted,
    }
}

/// Format a rem quantity as px, dropping a trailing `.0`.
fn px_value(rem: f64) -> String {
    let px = rem * ROOT_PX;
    if px.fract() == 0.0 {
        format!("{}px", px as i64)
    } else {
        format!("{px}px")
    }
}
