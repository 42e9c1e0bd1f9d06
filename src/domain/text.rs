/// Dialogue text staging.
///
/// Bundle strings cannot hold real newlines, so line breaks are written as
/// `^`. Every string shown in the panel goes through `stage_into`.

/// Capacity of the staging buffer in characters, terminator included.
pub const TEXT_BUF_CHARS: usize = 256;

/// Replace every `^` with `\n`, in place.
pub fn endlinize(text: &mut String) {
    if text.contains('^') {
        *text = text.replace('^', "\n");
    }
}

/// Copy `raw` into `buf` (at most `TEXT_BUF_CHARS - 1` chars), then endlinize.
pub fn stage_into(buf: &mut String, raw: &str) {
    buf.clear();
    buf.extend(raw.chars().take(TEXT_BUF_CHARS - 1));
    endlinize(buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carets_become_newlines() {
        let mut s = String::from("Kenny: Mmmmmmmm.^*Kenny dies*^");
        endlinize(&mut s);
        assert_eq!(s, "Kenny: Mmmmmmmm.\n*Kenny dies*\n");
        assert!(!s.contains('^'));
    }

    #[test]
    fn newline_sits_where_each_caret_was() {
        let raw = "a^b^^c";
        let mut s = raw.to_string();
        endlinize(&mut s);
        for (i, ch) in raw.char_indices() {
            if ch == '^' {
                assert_eq!(&s[i..i + 1], "\n");
            }
        }
        assert_eq!(s.len(), raw.len());
    }

    #[test]
    fn plain_text_is_untouched() {
        let mut s = String::from("Hamlet stabs the rat");
        endlinize(&mut s);
        assert_eq!(s, "Hamlet stabs the rat");
    }

    #[test]
    fn staging_truncates_to_buffer() {
        let raw = "x".repeat(400);
        let mut buf = String::new();
        stage_into(&mut buf, &raw);
        assert_eq!(buf.chars().count(), TEXT_BUF_CHARS - 1);
    }

    #[test]
    fn staging_replaces_previous_contents() {
        let mut buf = String::from("old text");
        stage_into(&mut buf, "Stan: Oh my god!^~THE END~");
        assert_eq!(buf, "Stan: Oh my god!\n~THE END~");
    }
}
