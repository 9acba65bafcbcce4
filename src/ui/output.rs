use crate::entry::LocalizedString;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::GLOBE, text.style(theme().resource));
}

/// `🌐 App.Strings (zh-CN)`
pub fn resource_heading(resource: &str, locale: &str) {
    let label = format!("({})", locale);
    println!(
        "{} {} {}",
        Icons::GLOBE,
        resource.style(theme().resource),
        label.style(theme().locale)
    );
}

/// A resolved value, marked by whether it is a real translation
pub fn translation(string: &LocalizedString) -> String {
    string.value.style(theme().for_string(string)).to_string()
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().translated));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().failure));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().untranslated));
}

pub fn info(label: &str, value: &str) {
    println!("{} {}: {}", Icons::INFO, label.style(theme().faint), value);
}

/// A key listed without a translation
pub fn missing(key: &str) {
    println!("  {} {}", Icons::GAP, key.style(theme().untranslated));
}

pub fn dim(text: &str) -> String {
    text.style(theme().faint).to_string()
}
