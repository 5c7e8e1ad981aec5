//! PDF assembly for detection reports.
//!
//! The renderer takes the pure layout output and replays it as draw calls:
//! front matter and metrics card on page one, body lines at their computed
//! positions, and a footer on every page. Pages use the two built-in
//! Helvetica faces, so the only embedded resource is the optional theme
//! logo.

use image::GenericImageView;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};

use crate::report::fonts::Font;
use crate::report::layout::{
    self, BODY_FONT, BODY_SIZE, CARD_HEIGHT, CARD_TOP, CARD_WIDTH, CARD_X, DISCLAIMER_Y, FOOTER_Y,
    HEADER_Y, MARGIN_LEFT, PAGE_HEIGHT, PAGE_WIDTH, PageText, RESULT_ROW_Y,
};
use crate::report::theme::ReportTheme;
use crate::report::{ReportError, ReportResult};
use crate::verdict::Score;
use crate::words;

/// MIME type for streaming a rendered report.
pub const REPORT_MIME_TYPE: &str = "application/pdf";
/// Suggested download filename for a rendered report.
pub const REPORT_FILENAME: &str = "ai-detection-report.pdf";

const RIGHT_COL_X: f64 = PAGE_WIDTH - 180.0;
const LOGO_TAG: &[u8] = b"Logo";
const LOGO_WIDTH: f64 = 92.0;
const LOGO_HEIGHT: f64 = 28.0;

const AI_SWATCH: (f32, f32, f32) = (1.0, 0.55, 0.1);
const HUMAN_SWATCH: (f32, f32, f32) = (0.7, 0.88, 1.0);

const DISCLAIMER_LINE_1: &str = "Caution: Our AI Detector is advanced, but no detectors are 100% reliable, no matter what their accuracy scores claim.";
const DISCLAIMER_LINE_2: &str = "Never use AI detection alone to make decisions that could impact a person's career or academic standing.";

/// One report to render: the analyzed text plus the score to present.
///
/// Ephemeral by design. The request is consumed by rendering and never
/// persisted; quota accounting happened before it was built.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    body_text: String,
    word_count: u64,
    score: Score,
}

impl RenderRequest {
    /// Build a request, deriving the word count from `body_text`.
    ///
    /// Text without a single word is rejected here, before any canvas work
    /// starts.
    pub fn new(body_text: impl Into<String>, score: Score) -> crate::Result<Self> {
        let body_text = body_text.into();
        let word_count = words::count(&body_text);
        if word_count == 0 {
            return Err(crate::Error::EmptyInput);
        }
        Ok(Self {
            body_text,
            word_count,
            score,
        })
    }

    /// Replace the derived word count with one the caller already computed.
    pub fn with_word_count(mut self, word_count: u64) -> Self {
        self.word_count = word_count;
        self
    }

    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    pub fn word_count(&self) -> u64 {
        self.word_count
    }

    pub fn score(&self) -> Score {
        self.score
    }
}

/// A finished document plus the layout facts callers log or echo back.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    bytes: Vec<u8>,
    page_count: usize,
}

impl RenderedReport {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

/// Renders detection reports under one theme.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    theme: ReportTheme,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self {
            theme: ReportTheme::default(),
        }
    }
}

impl ReportRenderer {
    pub fn new(theme: ReportTheme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &ReportTheme {
        &self.theme
    }

    /// Render `request` into a complete PDF.
    ///
    /// The body is sanitized and laid out first; only then are pages drawn,
    /// so a failure decoding theme resources happens before any output
    /// exists and the caller never sees a partial buffer.
    pub fn render(&self, request: &RenderRequest) -> ReportResult<RenderedReport> {
        let logo = match self.theme.logo_jpeg.as_deref() {
            Some(bytes) => Some(Logo::decode(bytes)?),
            None => None,
        };

        let body = layout::sanitize(&request.body_text);
        let pages = layout::paginate(&body, layout::BODY_START_Y);
        let bytes = self.assemble(request, logo.as_ref(), &pages);

        tracing::debug!(
            pages = pages.len(),
            bytes = bytes.len(),
            words = request.word_count,
            "Report rendered"
        );

        Ok(RenderedReport {
            bytes,
            page_count: pages.len(),
        })
    }

    fn assemble(
        &self,
        request: &RenderRequest,
        logo: Option<&Logo<'_>>,
        pages: &[PageText],
    ) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let body_font_id = Ref::new(3);
        let bold_font_id = Ref::new(4);

        let mut next_id = 5;
        let mut bump = || {
            let id = Ref::new(next_id);
            next_id += 1;
            id
        };
        let logo_id = logo.map(|_| bump());
        let page_refs: Vec<(Ref, Ref)> = pages.iter().map(|_| (bump(), bump())).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_refs.iter().map(|(page_id, _)| *page_id))
            .count(pages.len() as i32);

        pdf.type1_font(body_font_id)
            .base_font(Name(Font::Helvetica.base_name().as_bytes()));
        pdf.type1_font(bold_font_id)
            .base_font(Name(Font::HelveticaBold.base_name().as_bytes()));

        if let (Some(logo), Some(id)) = (logo, logo_id) {
            let mut xobject = pdf.image_xobject(id, logo.data);
            xobject.filter(Filter::DctDecode);
            xobject.width(logo.width as i32);
            xobject.height(logo.height as i32);
            if logo.grayscale {
                xobject.color_space().device_gray();
            } else {
                xobject.color_space().device_rgb();
            }
            xobject.bits_per_component(8);
        }

        let total = pages.len();
        for (index, (refs, page_text)) in page_refs.iter().zip(pages).enumerate() {
            let (page_id, content_id) = *refs;
            {
                let mut page = pdf.page(page_id);
                page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH as f32, PAGE_HEIGHT as f32));
                page.parent(page_tree_id);
                page.contents(content_id);
                let mut resources = page.resources();
                let mut font_dict = resources.fonts();
                font_dict.pair(Name(Font::Helvetica.resource_tag()), body_font_id);
                font_dict.pair(Name(Font::HelveticaBold.resource_tag()), bold_font_id);
                font_dict.finish();
                if let Some(id) = logo_id {
                    resources.x_objects().pair(Name(LOGO_TAG), id);
                }
            }

            let mut content = Content::new();
            if index == 0 {
                self.draw_front_matter(&mut content, request, logo.is_some());
            }
            draw_body(&mut content, page_text);
            self.draw_footer(&mut content, index + 1, total);
            pdf.stream(content_id, &content.finish());
        }

        pdf.finish()
    }

    /// Header band, metrics card, result row, and disclaimer. Drawn once,
    /// on page one only.
    fn draw_front_matter(&self, content: &mut Content, request: &RenderRequest, has_logo: bool) {
        text_at(
            content,
            Font::Helvetica,
            11.0,
            MARGIN_LEFT,
            HEADER_Y + 10.0,
            "AI detection report by",
        );
        if has_logo {
            content.save_state();
            content.transform([
                LOGO_WIDTH as f32,
                0.0,
                0.0,
                LOGO_HEIGHT as f32,
                MARGIN_LEFT as f32,
                (HEADER_Y - 18.0) as f32,
            ]);
            content.x_object(Name(LOGO_TAG));
            content.restore_state();
        } else {
            text_at(
                content,
                Font::HelveticaBold,
                16.0,
                MARGIN_LEFT,
                HEADER_Y - 12.0,
                &self.theme.brand_name,
            );
        }

        let generated = format!(
            "Generated {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M")
        );
        content.set_fill_gray(0.35);
        text_at(
            content,
            Font::Helvetica,
            9.0,
            MARGIN_LEFT + 120.0,
            HEADER_Y - 12.0,
            &generated,
        );
        text_at(
            content,
            Font::Helvetica,
            10.0,
            RIGHT_COL_X,
            HEADER_Y + 10.0,
            &self.theme.version_tag,
        );
        content.set_fill_gray(0.0);
        text_at(
            content,
            Font::HelveticaBold,
            10.0,
            RIGHT_COL_X,
            HEADER_Y - 6.0,
            &format!("{} Words", request.word_count),
        );

        // Metrics card
        content.save_state();
        content.set_fill_rgb(0.99, 0.99, 0.99);
        content.set_stroke_rgb(0.94, 0.94, 0.94);
        content.set_line_width(1.0);
        content.rect(
            CARD_X as f32,
            (CARD_TOP - CARD_HEIGHT) as f32,
            CARD_WIDTH as f32,
            CARD_HEIGHT as f32,
        );
        content.fill_nonzero_and_stroke();
        content.restore_state();

        let score = request.score;
        let ai_pct = format!("{:.0}%", score.value());
        let human_pct = format!("{:.0}%", score.human());

        text_at(
            content,
            Font::HelveticaBold,
            38.0,
            CARD_X + 24.0,
            CARD_TOP - 64.0,
            &ai_pct,
        );
        content.set_fill_gray(0.35);
        text_at(
            content,
            Font::Helvetica,
            11.0,
            CARD_X + 24.0,
            CARD_TOP - 84.0,
            "of this text is likely AI-generated",
        );
        content.set_fill_gray(0.0);
        text_at(
            content,
            Font::HelveticaBold,
            14.0,
            CARD_X + 24.0,
            CARD_TOP - 122.0,
            score.label().as_str(),
        );
        content.set_fill_gray(0.35);
        text_at(
            content,
            Font::Helvetica,
            10.0,
            CARD_X + 24.0,
            CARD_TOP - 140.0,
            &format!("Confidence: {}", score.confidence()),
        );
        content.set_fill_gray(0.0);

        let legend_x = CARD_X + CARD_WIDTH / 2.0 + 20.0;
        swatch(content, legend_x, CARD_TOP - 48.0, AI_SWATCH);
        text_at(
            content,
            Font::Helvetica,
            10.0,
            legend_x + 14.0,
            CARD_TOP - 47.0,
            &format!("AI-generated: {ai_pct}"),
        );
        swatch(content, legend_x, CARD_TOP - 78.0, HUMAN_SWATCH);
        text_at(
            content,
            Font::Helvetica,
            10.0,
            legend_x + 14.0,
            CARD_TOP - 77.0,
            &format!("Human-written: {human_pct}"),
        );

        // Result row
        content.save_state();
        content.set_fill_rgb(0.985, 0.985, 0.985);
        content.set_stroke_rgb(0.94, 0.94, 0.94);
        content.set_line_width(1.0);
        content.rect(
            CARD_X as f32,
            (RESULT_ROW_Y - 10.0) as f32,
            CARD_WIDTH as f32,
            36.0,
        );
        content.fill_nonzero_and_stroke();
        content.restore_state();
        text_at(
            content,
            Font::HelveticaBold,
            11.0,
            CARD_X + 16.0,
            RESULT_ROW_Y + 4.0,
            &format!(
                "Result: {} ({} AI, {} Human)",
                score.label(),
                ai_pct,
                human_pct
            ),
        );

        // Caution banner
        content.save_state();
        content.set_fill_rgb(1.0, 0.9, 0.55);
        content.set_stroke_rgb(1.0, 0.75, 0.2);
        content.set_line_width(1.0);
        content.move_to((CARD_X + 10.0) as f32, (DISCLAIMER_Y - 2.0) as f32);
        content.line_to((CARD_X + 24.0) as f32, (DISCLAIMER_Y - 2.0) as f32);
        content.line_to((CARD_X + 17.0) as f32, (DISCLAIMER_Y + 10.0) as f32);
        content.close_path();
        content.fill_nonzero_and_stroke();
        content.restore_state();

        content.set_fill_gray(0.25);
        text_at(
            content,
            Font::Helvetica,
            9.0,
            CARD_X + 32.0,
            DISCLAIMER_Y + 2.0,
            DISCLAIMER_LINE_1,
        );
        text_at(
            content,
            Font::Helvetica,
            9.0,
            CARD_X + 32.0,
            DISCLAIMER_Y - 10.0,
            DISCLAIMER_LINE_2,
        );
        content.set_fill_gray(0.0);
    }

    /// Rule, brand line, and page marker. Drawn on every page, the last
    /// included.
    fn draw_footer(&self, content: &mut Content, number: usize, total: usize) {
        content.save_state();
        content.set_stroke_rgb(0.9, 0.9, 0.9);
        content.set_line_width(0.5);
        content.move_to(MARGIN_LEFT as f32, (FOOTER_Y + 12.0) as f32);
        content.line_to((PAGE_WIDTH - MARGIN_LEFT) as f32, (FOOTER_Y + 12.0) as f32);
        content.stroke();
        content.restore_state();

        content.set_fill_gray(0.45);
        text_at(
            content,
            Font::Helvetica,
            8.0,
            MARGIN_LEFT,
            FOOTER_Y,
            &format!("Generated by {} AI Detector", self.theme.brand_name),
        );
        text_right_aligned(
            content,
            Font::Helvetica,
            8.0,
            PAGE_WIDTH - MARGIN_LEFT,
            FOOTER_Y,
            &format!("Page {number} of {total}"),
        );
        content.set_fill_gray(0.0);
    }
}

/// Decoded theme logo. Validation happens here so an undecodable image
/// fails the render before any page exists.
struct Logo<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    grayscale: bool,
}

impl<'a> Logo<'a> {
    fn decode(bytes: &'a [u8]) -> ReportResult<Self> {
        let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
            .map_err(|e| ReportError::resource_init("logo image", e))?;
        let (width, height) = image.dimensions();
        Ok(Self {
            data: bytes,
            width,
            height,
            grayscale: !image.color().has_color(),
        })
    }
}

fn draw_body(content: &mut Content, page: &PageText) {
    for line in &page.lines {
        text_at(content, BODY_FONT, BODY_SIZE, MARGIN_LEFT, line.y, &line.text);
    }
}

fn text_at(content: &mut Content, font: Font, size: f64, x: f64, y: f64, text: &str) {
    content.begin_text();
    content.set_font(Name(font.resource_tag()), size as f32);
    content.next_line(x as f32, y as f32);
    content.show(Str(text.as_bytes()));
    content.end_text();
}

fn text_right_aligned(content: &mut Content, font: Font, size: f64, right_x: f64, y: f64, text: &str) {
    let x = right_x - font.text_width(text, size);
    text_at(content, font, size, x, y, text);
}

fn swatch(content: &mut Content, x: f64, y: f64, rgb: (f32, f32, f32)) {
    content.save_state();
    content.set_fill_rgb(rgb.0, rgb.1, rgb.2);
    content.rect(x as f32, y as f32, 8.0, 8.0);
    content.fill_nonzero();
    content.restore_state();
}
