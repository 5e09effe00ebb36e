const COMMANDS: &[&str] = &["get_initial_link", "subscribe", "unsubscribe"];

fn main() {
    tauri_plugin::Builder::new(COMMANDS).build();
}
