//! Clock, base-36, escaping and ID helpers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Get a time-based seed value for pseudo-random number generation.
pub fn time_seed_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(12345)
}

/// Get current time as milliseconds since Unix epoch.
pub fn time_now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Render a number in lowercase base 36.
///
/// # Examples
///
/// ```
/// use blockmail::util::to_base36;
///
/// assert_eq!(to_base36(0), "0");
/// assert_eq!(to_base36(35), "z");
/// assert_eq!(to_base36(36), "10");
/// ```
pub fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(13);
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    // Only ASCII digits were pushed
    String::from_utf8(buf).unwrap_or_default()
}

/// Escape text for use in HTML content or a double-quoted attribute.
///
/// # Examples
///
/// ```
/// use blockmail::util::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
///            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Where an [`IdGenerator`] reads the current time from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clock {
    System,
    Fixed(u64),
}

/// Generator for process-unique identifiers.
///
/// IDs look like `prefix-<time>-<counter>-<rand>`, each part in base 36. The
/// counter makes every ID from one generator distinct; the time and random
/// suffix only make collisions across generators unlikely.
///
/// The generator is an explicit value: the registry takes one to mint its
/// zone identifiers and the tree renderer takes one for list keys. Use
/// [`IdGenerator::deterministic`] in tests.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    counter: u64,
    state: u64,
    clock: Clock,
}

impl IdGenerator {
    /// Create a generator seeded from the system clock.
    pub fn new() -> Self {
        Self {
            counter: 0,
            state: time_seed_nanos(),
            clock: Clock::System,
        }
    }

    /// Create a generator with a fixed clock and seed.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            counter: 0,
            state: seed,
            clock: Clock::Fixed(seed),
        }
    }

    /// Number of IDs handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter
    }

    /// Produce the next identifier with the given prefix.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        let now = match self.clock {
            Clock::System => time_now_millis(),
            Clock::Fixed(t) => t,
        };
        format!(
            "{}-{}-{}-{}",
            prefix,
            to_base36(now),
            to_base36(self.counter),
            self.random_suffix()
        )
    }

    /// Four base-36 characters from a 64-bit LCG.
    fn random_suffix(&mut self) -> String {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let bits = (self.state >> 33) % (36u64.pow(4));
        format!("{:0>4}", to_base36(bits))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
