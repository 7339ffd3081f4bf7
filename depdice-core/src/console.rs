use std::env;
use std::sync::OnceLock;

fn use_color() -> bool {
    static USE_COLOR: OnceLock<bool> = OnceLock::new();
    *USE_COLOR.get_or_init(|| env::var_os("NO_COLOR").is_none())
}

fn paint(code: &str, text: &str) -> String {
    if use_color() {
        format!("\u{1b}[{}m{}\u{1b}[0m", code, text)
    } else {
        text.to_string()
    }
}

pub fn bold(text: &str) -> String {
    paint("1", text)
}

pub fn underline(text: &str) -> String {
    paint("4", text)
}

pub fn green_bold(text: &str) -> String {
    paint("1;32", text)
}

pub fn yellow(text: &str) -> String {
    paint("33", text)
}

pub fn yellow_bold(text: &str) -> String {
    paint("1;33", text)
}

pub fn red(text: &str) -> String {
    paint("31", text)
}

pub fn red_bold(text: &str) -> String {
    paint("1;31", text)
}

pub fn error(message: &str) {
    let tag = red("error");
    eprintln!("{} {}", tag, message);
}
