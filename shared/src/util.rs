/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current local time as an ISO-8601 string (receipt timestamps)
pub fn now_local_iso() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Render a wait duration in Spanish, e.g. 125 -> "2 minutos y 5 segundos".
///
/// Values under a minute render seconds only ("45 segundos"); exact
/// minutes render without a seconds clause ("2 minutos").
pub fn format_wait_seconds(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    let plural = |n: u64, singular: &str, plural: &str| {
        if n == 1 {
            format!("{} {}", n, singular)
        } else {
            format!("{} {}", n, plural)
        }
    };

    match (minutes, seconds) {
        (0, s) => plural(s, "segundo", "segundos"),
        (m, 0) => plural(m, "minuto", "minutos"),
        (m, s) => format!(
            "{} y {}",
            plural(m, "minuto", "minutos"),
            plural(s, "segundo", "segundos")
        ),
    }
}
