//! Garbage detection for extracted text
//!
//! PDFs with broken font encodings (Identity-H without ToUnicode and friends)
//! often "succeed" but produce replacement or private-use characters. Such
//! output is rejected so the next backend gets a chance.

/// Share of suspicious characters above which output is rejected
const MAX_GARBAGE_RATIO: f64 = 0.15;
/// Private-use glyphs alone point at an unmapped font
const MAX_PRIVATE_USE_RATIO: f64 = 0.10;

/// Character counts of an extracted text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharCensus {
    pub total: usize,
    pub replacement: usize,
    pub private_use: usize,
    /// C0 controls other than line breaks, tab and the page separator
    pub control: usize,
}

impl CharCensus {
    pub fn of(text: &str) -> Self {
        text.chars().fold(Self::default(), |mut census, c| {
            census.total += 1;
            match c {
                '\u{FFFD}' => census.replacement += 1,
                '\u{E000}'..='\u{F8FF}' => census.private_use += 1,
                '\n' | '\r' | '\t' | '\x0C' => {}
                c if c.is_ascii_control() && c != '\x7F' => census.control += 1,
                _ => {}
            }
            census
        })
    }

    fn share(&self, count: usize) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            count as f64 / self.total as f64
        }
    }

    pub fn garbage_ratio(&self) -> f64 {
        self.share(self.replacement + self.private_use + self.control)
    }

    pub fn private_use_ratio(&self) -> f64 {
        self.share(self.private_use)
    }
}

/// Accept the text or explain why it looks like a broken encoding
pub fn check_text_quality(text: &str) -> Result<CharCensus, String> {
    let census = CharCensus::of(text);
    if census.total == 0 {
        return Err("empty text".to_string());
    }

    let garbage = census.garbage_ratio();
    if garbage > MAX_GARBAGE_RATIO {
        return Err(format!(
            "{:.1}% unreadable characters ({} replacement, {} private-use, {} control)",
            garbage * 100.0,
            census.replacement,
            census.private_use,
            census.control
        ));
    }

    let private_use = census.private_use_ratio();
    if private_use > MAX_PRIVATE_USE_RATIO {
        return Err(format!(
            "{:.1}% private-use glyphs, font has no unicode mapping",
            private_use * 100.0
        ));
    }

    Ok(census)
}
