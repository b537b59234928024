//! Text normalization, measurement and word wrapping.
//!
//! Output goes through the standard Type1 fonts with WinAnsi encoding, which
//! can only represent Latin-1. Everything drawn is passed through [`sanitize`]
//! first; all functions here are total.

/// The three built-in faces used by the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
}

impl FontFace {
    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
            Self::Oblique => "Helvetica-Oblique",
        }
    }

    /// Resource name used in page content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
            Self::Oblique => "F3",
        }
    }
}

/// Helvetica advance widths for 0x20..=0x7E, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold advance widths for 0x20..=0x7E, in 1/1000 em.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Width used for Latin-1 supplement characters.
const LATIN1_FALLBACK_WIDTH: u16 = 556;

fn char_width(face: FontFace, ch: char) -> u16 {
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        let idx = (code - 0x20) as usize;
        match face {
            FontFace::Bold => HELVETICA_BOLD_WIDTHS[idx],
            FontFace::Regular | FontFace::Oblique => HELVETICA_WIDTHS[idx],
        }
    } else if (0xA0..=0xFF).contains(&code) {
        LATIN1_FALLBACK_WIDTH
    } else {
        0
    }
}

/// Rendered width of `text` in points.
pub fn measure(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = text.chars().map(|ch| char_width(face, ch) as u32).sum();
    units as f32 * size / 1000.0
}

fn is_pictographic(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1F000..=0x1FAFF
            | 0x2600..=0x27BF
            | 0x2B00..=0x2BFF
            | 0x2300..=0x23FF
            | 0xFE00..=0xFE0F
            | 0x200D
            | 0x20E3
            | 0xE0000..=0xE007F
    )
}

fn map_typographic(ch: char) -> Option<&'static str> {
    let mapped = match ch {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => "\"",
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' => "-",
        '\u{2026}' => "...",
        '\u{2022}' | '\u{00B7}' => "*",
        '\u{00A0}' | '\u{2002}' | '\u{2003}' | '\u{2009}' | '\u{202F}' => " ",
        _ => return None,
    };
    Some(mapped)
}

/// Normalize text for drawing.
///
/// Line breaks and tabs become spaces, other control characters are
/// dropped, typographic quotes and dashes map to
/// ASCII, emoji and pictographs are removed, anything else outside Latin-1
/// becomes `?`. Whitespace runs collapse to one space and the result is trimmed.
pub fn sanitize(input: &str) -> String {
    let mut mapped = String::with_capacity(input.len());

    for ch in input.chars() {
        if let Some(replacement) = map_typographic(ch) {
            mapped.push_str(replacement);
        } else if matches!(ch, '\t' | '\n' | '\r' | '\u{2028}' | '\u{2029}') {
            mapped.push(' ');
        } else if ch.is_control() {
            continue;
        } else if is_pictographic(ch) || ch == '\u{200B}' || ch == '\u{FEFF}' {
            continue;
        } else if (ch as u32) < 0x100 {
            mapped.push(ch);
        } else {
            mapped.push('?');
        }
    }

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on line breaks and sanitize each paragraph, dropping blank ones.
pub fn paragraphs(input: &str) -> Vec<String> {
    input
        .split(['\n', '\r'])
        .map(sanitize)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Greedy line breaking on whitespace.
///
/// Tokens accumulate while the candidate line fits in `max_width`; the token
/// that overflows starts the next line. A token that is wider than
/// `max_width` on its own is split by characters.
pub fn wrap_text(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let clean = sanitize(text);
    let mut lines = Vec::new();
    if clean.is_empty() {
        return lines;
    }

    let mut current = String::new();
    for word in clean.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate, face, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if measure(word, face, size) <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = split_long_word(word, face, size, max_width);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_word(word: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if measure(&piece, face, size) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Encode sanitized text as WinAnsi bytes for a PDF string.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| if (ch as u32) < 0x100 { ch as u8 } else { b'?' })
        .collect()
}
