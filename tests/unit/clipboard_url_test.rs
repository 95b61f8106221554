use rstest::rstest;

use tabkeys::services::clipboard_url::{resolve_clipboard_text, ClipboardTarget};
use tabkeys::types::settings::EngineSettings;

#[rstest]
#[case("https://rust-lang.org/learn", "https://rust-lang.org/learn")]
#[case("  https://example.com  \n", "https://example.com")]
#[case("mailto:someone@example.com", "mailto:someone@example.com")]
fn test_absolute_urls_open_as_is(#[case] text: &str, #[case] expected: &str) {
    let target = resolve_clipboard_text(text, &EngineSettings::default()).unwrap();
    assert_eq!(target, ClipboardTarget::Url(expected.to_string()));
}

#[test]
fn test_plain_text_becomes_search() {
    let target = resolve_clipboard_text("rust borrow checker", &EngineSettings::default()).unwrap();
    assert_eq!(
        target,
        ClipboardTarget::Search("https://www.google.com/search?q=rust+borrow+checker".to_string())
    );
}

#[test]
fn test_bare_domain_is_searched() {
    let target = resolve_clipboard_text("example.com", &EngineSettings::default()).unwrap();
    assert!(matches!(target, ClipboardTarget::Search(_)));
    assert!(target.url().ends_with("q=example.com"));
}

#[test]
fn test_custom_search_engine() {
    let settings = EngineSettings {
        search_url: "https://duckduckgo.com/".to_string(),
        search_param: "query".to_string(),
        ..EngineSettings::default()
    };
    let target = resolve_clipboard_text("a&b", &settings).unwrap();
    assert_eq!(target.url(), "https://duckduckgo.com/?query=a%26b");
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t")]
fn test_blank_text_resolves_to_nothing(#[case] text: &str) {
    assert!(resolve_clipboard_text(text, &EngineSettings::default()).is_none());
}

#[test]
fn test_invalid_search_url_resolves_to_nothing() {
    let settings = EngineSettings { search_url: "not a url".to_string(), ..EngineSettings::default() };
    assert!(resolve_clipboard_text("hello", &settings).is_none());
}
