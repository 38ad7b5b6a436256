/// Formats seconds as `HH:MM:SS`. Hours are not wrapped at 24 and grow past
/// two digits when needed.
pub fn format_countdown(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
