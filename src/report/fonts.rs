//! Built-in font metrics for width-accurate text layout.
//!
//! Wrap decisions and the drawn glyphs must come from the same metrics, or
//! lines break in one place and paint in another. The tables below are the
//! Adobe AFM advance widths (thousandths of an em) for the printable-ASCII
//! range of the two standard faces the renderer uses; the sanitizer
//! guarantees nothing outside that range reaches measurement.

/// Faces available to the renderer. Both are PDF standard-14 fonts, so the
/// document embeds no font program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// PostScript name written into the PDF font dictionary.
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Tag naming this face inside page resource dictionaries.
    pub(crate) fn resource_tag(self) -> &'static [u8] {
        match self {
            Font::Helvetica => b"F1",
            Font::HelveticaBold => b"F2",
        }
    }

    /// Advance width of `ch` in thousandths of an em. Characters outside
    /// printable ASCII measure zero; the sanitizer strips them before
    /// layout.
    fn advance(self, ch: char) -> u16 {
        let code = ch as u32;
        if !(0x20..=0x7E).contains(&code) {
            return 0;
        }
        let table = match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        table[(code - 0x20) as usize]
    }

    /// Rendered width of `text` at `size` points.
    pub fn text_width(self, text: &str, size: f64) -> f64 {
        let units: u64 = text.chars().map(|ch| u64::from(self.advance(ch))).sum();
        units as f64 * size / 1000.0
    }
}

/// Helvetica advance widths for 0x20..=0x7E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, // space ! " # $ % & ' ( )
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556, // * + , - . / 0 1 2 3
    556, 556, 556, 556, 556, 556, 278, 278, 584, 584, // 4 5 6 7 8 9 : ; < =
    584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, // > ? @ A B C D E F G
    722, 278, 500, 667, 556, 833, 722, 778, 667, 778, // H I J K L M N O P Q
    722, 667, 611, 722, 667, 944, 667, 667, 611, 278, // R S T U V W X Y Z [
    278, 278, 469, 556, 333, 556, 556, 500, 556, 556, // \ ] ^ _ ` a b c d e
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // f g h i j k l m n o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, // p q r s t u v w x y
    500, 334, 260, 334, 584, // z { | } ~
];

/// Helvetica-Bold advance widths for 0x20..=0x7E.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, // space ! " # $ % & ' ( )
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556, // * + , - . / 0 1 2 3
    556, 556, 556, 556, 556, 556, 333, 333, 584, 584, // 4 5 6 7 8 9 : ; < =
    584, 611, 975, 722, 722, 722, 722, 667, 611, 778, // > ? @ A B C D E F G
    722, 278, 556, 722, 611, 833, 722, 778, 667, 778, // H I J K L M N O P Q
    722, 667, 611, 722, 667, 944, 667, 667, 611, 333, // R S T U V W X Y Z [
    278, 333, 584, 556, 333, 556, 611, 556, 611, 556, // \ ] ^ _ ` a b c d e
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // f g h i j k l m n o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, // p q r s t u v w x y
    500, 389, 280, 389, 584, // z { | } ~
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_advance_sums() {
        // H(722) + e(556) + l(222) + l(222) + o(556) = 2278 units.
        let width = Font::Helvetica.text_width("Hello", 11.0);
        assert!((width - 25.058).abs() < 1e-9);

        // Bold H(722) + i(278) = 1000 units, exactly the size in points.
        let width = Font::HelveticaBold.text_width("Hi", 10.0);
        assert!((width - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_width_scales_linearly_with_size() {
        let at_11 = Font::Helvetica.text_width("sample text", 11.0);
        let at_22 = Font::Helvetica.text_width("sample text", 22.0);
        assert!((at_22 - 2.0 * at_11).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_measures_zero() {
        assert_eq!(Font::Helvetica.text_width("\u{e9}\u{2014}\u{7}", 11.0), 0.0);
        let plain = Font::Helvetica.text_width("cafe", 11.0);
        let accented = Font::Helvetica.text_width("caf\u{e9}e", 11.0);
        assert_eq!(plain, accented);
    }

    #[test]
    fn test_bold_is_wider_for_body_text() {
        let regular = Font::Helvetica.text_width("Detection Report", 11.0);
        let bold = Font::HelveticaBold.text_width("Detection Report", 11.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_empty_text_is_zero() {
        assert_eq!(Font::Helvetica.text_width("", 11.0), 0.0);
    }

    #[test]
    fn test_resource_tags_distinct() {
        assert_ne!(
            Font::Helvetica.resource_tag(),
            Font::HelveticaBold.resource_tag()
        );
        assert_eq!(Font::Helvetica.base_name(), "Helvetica");
        assert_eq!(Font::HelveticaBold.base_name(), "Helvetica-Bold");
    }
}
