//! Donation receipt (A4)

use super::pdf::{Canvas, Font, Rgb, fit_text, wrap_text};
use super::words::{amount_in_words, format_amount};
use super::{OrganizationProfile, RenderError};
use crate::entities::{Donation, DonationStatus};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const LABEL_X: f32 = MARGIN + 12.0;
const VALUE_X: f32 = MARGIN + 130.0;
const VALUE_WIDTH: f32 = PAGE_WIDTH - MARGIN - 12.0 - VALUE_X;

const BRAND: Rgb = Rgb(0.07, 0.33, 0.36);
const MUTED: Rgb = Rgb(0.35, 0.35, 0.35);
const BORDER: Rgb = Rgb(0.75, 0.75, 0.75);
const WATERMARK: Rgb = Rgb(0.93, 0.93, 0.93);

fn row(canvas: &mut Canvas, y: f32, label: &str, value: &str) {
    canvas.text(Font::Bold, 10.0, LABEL_X, y, label, MUTED);
    canvas.text(
        Font::Regular,
        10.0,
        VALUE_X,
        y,
        &fit_text(value, 10.0, VALUE_WIDTH),
        Rgb::BLACK,
    );
}

fn status_label(status: DonationStatus) -> &'static str {
    match status {
        DonationStatus::Pending => "Pending",
        DonationStatus::Completed => "Completed",
        DonationStatus::Failed => "Failed",
        DonationStatus::Refunded => "Refunded",
    }
}

fn watermark(canvas: &mut Canvas, org: &OrganizationProfile) {
    let text = fit_text(&org.name.to_uppercase(), 54.0, 620.0);
    canvas.text_rotated(Font::Bold, 54.0, 95.0, 220.0, 35.0, &text, WATERMARK);
}

fn header(canvas: &mut Canvas, org: &OrganizationProfile) {
    let center = PAGE_WIDTH / 2.0;
    canvas.fill_rect(0.0, PAGE_HEIGHT - 84.0, PAGE_WIDTH, 84.0, BRAND);
    canvas.text_centered(
        Font::Bold,
        20.0,
        center,
        PAGE_HEIGHT - 38.0,
        &fit_text(&org.name, 20.0, CONTENT_WIDTH),
        Rgb::WHITE,
    );
    canvas.text_centered(
        Font::Regular,
        9.0,
        center,
        PAGE_HEIGHT - 55.0,
        &fit_text(&org.address, 9.0, CONTENT_WIDTH),
        Rgb::WHITE,
    );
    canvas.text_centered(
        Font::Regular,
        9.0,
        center,
        PAGE_HEIGHT - 68.0,
        &fit_text(&org.contact_line(), 9.0, CONTENT_WIDTH),
        Rgb::WHITE,
    );

    canvas.text_centered(Font::Bold, 16.0, center, 728.0, "DONATION RECEIPT", BRAND);
    canvas.line((center - 90.0, 722.0), (center + 90.0, 722.0), 1.0, BRAND);
}

fn meta_box(canvas: &mut Canvas, donation: &Donation, org: &OrganizationProfile) {
    let right = PAGE_WIDTH - MARGIN - 12.0;
    canvas.stroke_rect(MARGIN, 655.0, CONTENT_WIDTH, 52.0, 0.8, BORDER);

    canvas.text(
        Font::Bold,
        10.0,
        LABEL_X,
        687.0,
        &format!("Receipt No.: {}", donation.receipt_number),
        Rgb::BLACK,
    );
    canvas.text_right(
        Font::Bold,
        10.0,
        right,
        687.0,
        &format!("Date: {}", donation.created_at.format("%d %b %Y")),
        Rgb::BLACK,
    );

    if let Some(registration) = &org.registration_number {
        canvas.text(
            Font::Regular,
            9.0,
            LABEL_X,
            668.0,
            &format!("Registration No.: {}", registration),
            MUTED,
        );
    }
    if let Some(pan) = &org.pan {
        canvas.text_right(Font::Regular, 9.0, right, 668.0, &format!("PAN: {}", pan), MUTED);
    }
}

fn donor_box(canvas: &mut Canvas, donation: &Donation) {
    canvas.stroke_rect(MARGIN, 520.0, CONTENT_WIDTH, 122.0, 0.8, BORDER);
    canvas.text(Font::Bold, 11.0, LABEL_X, 624.0, "RECEIVED WITH THANKS FROM", BRAND);

    row(canvas, 604.0, "Name", &donation.donor_name);
    row(canvas, 587.0, "Email", &donation.email);
    row(canvas, 570.0, "Phone", &donation.phone);
    row(
        canvas,
        553.0,
        "Address",
        donation.address.as_deref().unwrap_or("-"),
    );
    row(
        canvas,
        536.0,
        "Donor PAN",
        donation.pan_number.as_deref().unwrap_or("-"),
    );
}

fn payment_box(canvas: &mut Canvas, donation: &Donation, words: &str) {
    canvas.stroke_rect(MARGIN, 310.0, CONTENT_WIDTH, 196.0, 0.8, BORDER);
    canvas.text(Font::Bold, 11.0, LABEL_X, 488.0, "PAYMENT DETAILS", BRAND);

    canvas.text(Font::Bold, 10.0, LABEL_X, 464.0, "Amount", MUTED);
    canvas.text(
        Font::Bold,
        18.0,
        VALUE_X,
        462.0,
        &format!("Rs. {}", format_amount(donation.amount)),
        Rgb::BLACK,
    );

    canvas.text(Font::Bold, 10.0, LABEL_X, 440.0, "In Words", MUTED);
    let mut y = 440.0;
    for line in wrap_text(&format!("Rupees {}", words), 10.0, VALUE_WIDTH)
        .iter()
        .take(3)
    {
        canvas.text(Font::Regular, 10.0, VALUE_X, y, line, Rgb::BLACK);
        y -= 13.0;
    }

    row(canvas, 392.0, "Payment Method", donation.payment_method.label());
    row(
        canvas,
        375.0,
        "Transaction ID",
        donation.transaction_id.as_deref().unwrap_or("-"),
    );
    row(
        canvas,
        358.0,
        "Purpose",
        donation.purpose.as_deref().unwrap_or("General Donation"),
    );
    row(canvas, 341.0, "Status", status_label(donation.status));
}

fn footer(canvas: &mut Canvas, org: &OrganizationProfile) {
    let mut y = 285.0;
    if let Some(note) = &org.tax_exemption_note {
        for line in wrap_text(note, 9.0, CONTENT_WIDTH).iter().take(4) {
            canvas.text(Font::Regular, 9.0, MARGIN, y, line, MUTED);
            y -= 12.0;
        }
    }

    let sign_left = PAGE_WIDTH - MARGIN - 180.0;
    let sign_center = sign_left + 90.0;
    canvas.text_centered(
        Font::Regular,
        9.0,
        sign_center,
        200.0,
        &fit_text(&format!("For {}", org.name), 9.0, 180.0),
        Rgb::BLACK,
    );
    canvas.line((sign_left, 160.0), (PAGE_WIDTH - MARGIN, 160.0), 0.8, Rgb::BLACK);
    canvas.text_centered(
        Font::Bold,
        9.0,
        sign_center,
        147.0,
        &fit_text(&org.signatory, 9.0, 180.0),
        Rgb::BLACK,
    );

    canvas.line((MARGIN, 70.0), (PAGE_WIDTH - MARGIN, 70.0), 0.5, BORDER);
    canvas.text_centered(
        Font::Regular,
        8.0,
        PAGE_WIDTH / 2.0,
        56.0,
        "This is a computer generated receipt and does not require a physical signature.",
        MUTED,
    );
}

/// Render the receipt for `donation`
///
/// The output depends only on the arguments, so the same donation always
/// produces the same bytes.
pub fn render_receipt(
    donation: &Donation,
    org: &OrganizationProfile,
) -> Result<Vec<u8>, RenderError> {
    let words = amount_in_words(donation.amount)?;

    let mut canvas = Canvas::new(PAGE_WIDTH, PAGE_HEIGHT);
    watermark(&mut canvas, org);
    header(&mut canvas, org);
    meta_box(&mut canvas, donation, org);
    donor_box(&mut canvas, donation);
    payment_box(&mut canvas, donation, &words);
    footer(&mut canvas, org);

    canvas.finish(&format!("Donation Receipt {}", donation.receipt_number))
}
