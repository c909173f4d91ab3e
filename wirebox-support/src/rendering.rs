//! Text rendering utilities for human-friendly diagnostics.
//!
//! Provides helpers to shorten type names, suggest registry keys close to
//! a mistyped lookup, and render the registry as an aligned listing.

/// Shortens a fully qualified type name for display.
///
/// ```
/// use wirebox_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("my_app::widgets::Widget"), "Widget");
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
///     "Arc<dyn Logger>"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut segment_start = 0;

    for (idx, ch) in full_name.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            result.push_str(last_path_segment(&full_name[segment_start..idx]));
            result.push(ch);
            segment_start = idx + ch.len_utf8();
        }
    }

    result.push_str(last_path_segment(&full_name[segment_start..]));
    result
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Suggests registered dotted keys that look like a mistyped one.
///
/// Keys are compared token by token (`namespace.item.entry`): a candidate
/// sharing the namespace and item scores highest, then candidates whose
/// tokens match case-insensitively or share a long common prefix.
///
/// ```
/// use wirebox_support::rendering::suggest_similar;
///
/// let available = ["Widgets.Widget1.default", "Widgets.Prepender.default"];
/// let suggestions = suggest_similar("Widgets.Widgte1.default", &available, 3);
/// assert_eq!(suggestions[0], "Widgets.Widget1.default");
/// ```
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let wanted: Vec<String> = requested.split('.').map(str::to_lowercase).collect();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&candidate| candidate != requested)
        .filter_map(|&candidate| {
            let score: usize = candidate
                .split('.')
                .map(str::to_lowercase)
                .zip(&wanted)
                .map(|(have, want)| token_score(&have, want))
                .sum();
            (score >= 50).then_some((candidate, score))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

fn token_score(have: &str, want: &str) -> usize {
    if have == want {
        return 40;
    }
    if have.contains(want) || want.contains(have) {
        return 25;
    }
    let common = have
        .chars()
        .zip(want.chars())
        .take_while(|(a, b)| a == b)
        .count();
    if common >= 3 { common * 3 } else { 0 }
}

/// One line of a registry listing.
#[derive(Debug, Clone)]
pub struct ListingEntry {
    /// Dotted key, e.g. `Widgets.Widget1.default`
    pub key: String,
    /// Lifecycle label, e.g. `Singleton`
    pub lifecycle: String,
    /// Implementation that backs the entry
    pub implementation: Option<String>,
}

/// Renders registry entries as an aligned listing.
///
/// ```text
/// [Singleton    ] Widgets.Prepender.default  (from: Prepender)
/// [PerDependency] Widgets.Widget1.default  (from: Widget)
/// ```
pub fn render_listing(entries: &[ListingEntry]) -> String {
    let width = entries
        .iter()
        .map(|e| e.lifecycle.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!("[{:<width$}] {}", entry.lifecycle, entry.key));
        if let Some(ref implementation) = entry.implementation {
            out.push_str(&format!("  (from: {implementation})"));
        }
        out.push('\n');
    }
    out
}
