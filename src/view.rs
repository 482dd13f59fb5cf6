//! View renderer: turns the slide store into the page markup and owns the
//! small amount of view state the export routine writes to.

use crate::slides::{DeckIntro, Slide};
use crate::{Error, Result};
use minijinja::{context, Environment};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Inline notice shown after any failed export
pub const EXPORT_FAILURE_MESSAGE: &str = "Unable to create PDF. Please try again.";

pub const DOWNLOAD_LABEL: &str = "Download PDF";
pub const BUSY_LABEL: &str = "Creating PDF\u{2026}";

/// Attribute that marks a capturable slide block
pub const SLIDE_ATTR: &str = "data-slide";

/// Busy flag and inline error message.
///
/// The export routine is the only writer. `try_begin_export` is the single
/// check-and-set point for the busy flag.
#[derive(Debug, Default)]
pub struct ViewState {
    busy: AtomicBool,
    error: Mutex<Option<String>>,
}

/// Point-in-time copy of [`ViewState`] used for rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub busy: bool,
    pub error: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip idle -> exporting. Returns `false` when an export already runs.
    pub fn try_begin_export(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn finish_export(&self) {
        self.busy.store(false, Ordering::Release);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn set_error(&self, message: impl Into<String>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    pub fn clear_error(&self) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            busy: self.is_busy(),
            error: self.error_message(),
        }
    }
}

/// Label for the action button in the given state
pub fn button_label(busy: bool) -> &'static str {
    if busy {
        BUSY_LABEL
    } else {
        DOWNLOAD_LABEL
    }
}

/// 1-based, zero-padded slide index ("01", "02", ...)
pub fn slide_number(index: usize) -> String {
    format!("{:02}", index + 1)
}

/// Id of the heading that labels the slide at `index`
pub fn slide_label_id(index: usize) -> String {
    format!("slide-{}", index + 1)
}

/// Page template. Rendered under an `.html` name so every interpolated value
/// is HTML-escaped.
pub const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ intro.kicker }}</title>
<style>
body{margin:0;font-family:Georgia,serif;background:#f4f1ea;color:#1f2933}
.page{max-width:1040px;margin:0 auto;padding:48px 40px}
.kicker{text-transform:uppercase;letter-spacing:.12em;color:#9a3412}
.download-button{padding:12px 24px;border-radius:999px;border:0;background:#1f2933;color:#fff}
.download-button[disabled]{opacity:.6}
.error{color:#b91c1c}
.slides{display:flex;flex-direction:column;gap:32px}
.slide{width:960px;background:#fff;border:1px solid #e5e0d5;border-top:6px solid #9a3412;padding:40px;box-sizing:border-box}
.slide-meta{display:flex;gap:12px;align-items:baseline}
.slide-number{font-size:24px;color:#9a3412}
.slide-label{text-transform:uppercase;color:#6b7280}
.subtitle{color:#52606d}
.payoff{background:#fdf3e7;border-left:4px solid #9a3412;padding:16px}
.payoff-label{text-transform:uppercase;color:#9a3412}
</style>
</head>
<body>
<div class="page">
<header class="header">
<p class="kicker">{{ intro.kicker }}</p>
<h1>{{ intro.headline }}</h1>
<p class="lede">{{ intro.lede }}</p>
<button type="button" class="download-button"{% if busy %} disabled{% endif %} aria-busy="{{ busy }}">{{ button_label }}</button>
{% if error %}<p class="error" role="status">{{ error }}</p>
{% endif %}</header>
<main class="slides">
{% for slide in slides %}<section class="slide" data-slide aria-labelledby="{{ slide.label_id }}">
<div class="slide-meta"><span class="slide-number">{{ slide.number }}</span><span class="slide-label">Slide {{ slide.position }}</span></div>
<h2 id="{{ slide.label_id }}">{{ slide.title }}</h2>
{% if slide.subtitle %}<p class="subtitle">{{ slide.subtitle }}</p>
{% endif %}<ul class="points">
{% for point in slide.points %}<li>{{ point }}</li>
{% endfor %}</ul>
<div class="payoff"><span class="payoff-label">Practical payoff</span><p>{{ slide.payoff }}</p></div>
</section>
{% endfor %}</main>
</div>
</body>
</html>
"##;

/// Template context for one slide block
#[derive(Debug, Serialize)]
struct SlideContext<'a> {
    number: String,
    position: usize,
    label_id: String,
    #[serde(flatten)]
    slide: &'a Slide,
}

/// Render the complete page for `slides` in the given view state.
pub fn render_page(intro: &DeckIntro, slides: &[Slide], state: &ViewSnapshot) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("page.html", PAGE_TEMPLATE)
        .map_err(|e| Error::RenderError(format!("Bad page template: {}", e)))?;
    let tmpl = env
        .get_template("page.html")
        .map_err(|e| Error::RenderError(format!("Missing page template: {}", e)))?;

    let slides: Vec<SlideContext> = slides
        .iter()
        .enumerate()
        .map(|(index, slide)| SlideContext {
            number: slide_number(index),
            position: index + 1,
            label_id: slide_label_id(index),
            slide,
        })
        .collect();

    tmpl.render(context! {
        intro => intro,
        busy => state.busy,
        button_label => button_label(state.busy),
        error => state.error.as_deref(),
        slides => slides,
    })
    .map_err(|e| Error::RenderError(format!("Page render failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::{DECK, SLIDES};

    #[test]
    fn busy_flag_is_single_flight() {
        let state = ViewState::new();
        assert!(state.try_begin_export());
        assert!(!state.try_begin_export());
        assert!(state.is_busy());
        state.finish_export();
        assert!(!state.is_busy());
        assert!(state.try_begin_export());
    }

    #[test]
    fn renders_one_block_per_slide_in_order() {
        let html = render_page(&DECK, SLIDES, &ViewSnapshot::default()).unwrap();
        assert_eq!(html.matches(SLIDE_ATTR).count(), SLIDES.len());
        let mut last = 0;
        for (i, slide) in SLIDES.iter().enumerate() {
            let pos = html
                .find(&format!("<h2 id=\"slide-{}\">{}", i + 1, slide.title.replace('&', "&amp;")))
                .expect("title rendered");
            assert!(pos > last);
            last = pos;
        }
        assert!(html.contains("<span class=\"slide-number\">01</span>"));
        assert!(html.contains("<span class=\"slide-number\">05</span>"));
        assert!(html.contains("aria-labelledby=\"slide-3\""));
        assert!(html.contains("<h2 id=\"slide-3\">"));
    }

    #[test]
    fn header_reflects_busy_and_error_state() {
        let idle = render_page(&DECK, SLIDES, &ViewSnapshot::default()).unwrap();
        assert!(idle.contains(DOWNLOAD_LABEL));
        assert!(!idle.contains(" disabled"));
        assert!(!idle.contains("role=\"status\""));

        let busy = render_page(
            &DECK,
            SLIDES,
            &ViewSnapshot {
                busy: true,
                error: Some(EXPORT_FAILURE_MESSAGE.to_string()),
            },
        )
        .unwrap();
        assert!(busy.contains(BUSY_LABEL));
        assert!(busy.contains(" disabled aria-busy=\"true\""));
        assert!(busy.contains(EXPORT_FAILURE_MESSAGE));
    }

    #[test]
    fn missing_subtitle_is_omitted() {
        let slide = Slide {
            title: "Plain",
            subtitle: None,
            points: &["one"],
            payoff: "done",
        };
        let html = render_page(&DECK, &[slide], &ViewSnapshot::default()).unwrap();
        assert!(!html.contains("class=\"subtitle\""));
        assert!(html.contains("<span class=\"slide-label\">Slide 1</span>"));
    }

    #[test]
    fn slide_text_is_escaped() {
        let slide = Slide {
            title: "Fuel Creativity & <Innovation>",
            subtitle: Some("<script>alert(1)</script>"),
            points: &["a < b"],
            payoff: "done",
        };
        let state = ViewSnapshot {
            busy: false,
            error: Some("<b>bad</b>".into()),
        };
        let html = render_page(&DECK, &[slide], &state).unwrap();
        assert!(html.contains("Fuel Creativity &amp; &lt;Innovation&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<li>a &lt; b</li>"));
        assert!(!html.contains("<b>bad</b>"));
    }
}
