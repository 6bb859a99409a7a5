//! Member ID card (credit-card size, 243×153 pt)

use super::pdf::{Canvas, Font, Rgb, fit_text};
use super::{OrganizationProfile, RenderError};
use crate::entities::Member;
use qrcode::{Color, EcLevel, QrCode};

const CARD_WIDTH: f32 = 243.0;
const CARD_HEIGHT: f32 = 153.0;
const BAND_HEIGHT: f32 = 30.0;
const QR_SIZE: f32 = 66.0;
const PADDING: f32 = 10.0;

const BRAND: Rgb = Rgb(0.07, 0.33, 0.36);
const MUTED: Rgb = Rgb(0.35, 0.35, 0.35);

/// Text encoded in the card's QR code: `{membership_id}|{name}|{valid_until}`
pub fn qr_payload(member: &Member) -> String {
    let valid_until = member
        .valid_until
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{}|{}|{}", member.membership_id, member.name, valid_until)
}

/// Draw `payload` as a QR code whose top-left corner sits at `(x, top)`
///
/// Each row's consecutive dark modules are merged into one rectangle.
fn draw_qr(canvas: &mut Canvas, payload: &str, x: f32, top: f32, size: f32) -> Result<(), RenderError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .map_err(|e| RenderError::QrCode(e.to_string()))?;
    let width = code.width();
    let colors = code.to_colors();
    if width == 0 || colors.len() != width * width {
        return Err(RenderError::QrCode("unexpected module matrix".to_string()));
    }

    let quiet = 2.0;
    let module = size / (width as f32 + 2.0 * quiet);
    canvas.fill_rect(x, top - size, size, size, Rgb::WHITE);

    for (row, cells) in colors.chunks(width).enumerate() {
        let y = top - (row as f32 + quiet + 1.0) * module;
        let mut col = 0;
        while col < width {
            if cells[col] != Color::Dark {
                col += 1;
                continue;
            }
            let start = col;
            while col < width && cells[col] == Color::Dark {
                col += 1;
            }
            canvas.fill_rect(
                x + (start as f32 + quiet) * module,
                y,
                (col - start) as f32 * module,
                module,
                Rgb::BLACK,
            );
        }
    }
    Ok(())
}

/// Render the ID card for `member`
pub fn render_id_card(member: &Member, org: &OrganizationProfile) -> Result<Vec<u8>, RenderError> {
    let mut canvas = Canvas::new(CARD_WIDTH, CARD_HEIGHT);

    canvas.stroke_rect(0.5, 0.5, CARD_WIDTH - 1.0, CARD_HEIGHT - 1.0, 1.0, BRAND);
    canvas.fill_rect(0.0, CARD_HEIGHT - BAND_HEIGHT, CARD_WIDTH, BAND_HEIGHT, BRAND);
    canvas.text_centered(
        Font::Bold,
        10.0,
        CARD_WIDTH / 2.0,
        CARD_HEIGHT - 14.0,
        &fit_text(&org.name, 10.0, CARD_WIDTH - 2.0 * PADDING),
        Rgb::WHITE,
    );
    canvas.text_centered(
        Font::Regular,
        6.5,
        CARD_WIDTH / 2.0,
        CARD_HEIGHT - 24.0,
        "MEMBER IDENTITY CARD",
        Rgb::WHITE,
    );

    let text_width = CARD_WIDTH - QR_SIZE - 3.0 * PADDING;
    let mut y = CARD_HEIGHT - BAND_HEIGHT - 18.0;
    canvas.text(
        Font::Bold,
        11.0,
        PADDING,
        y,
        &fit_text(&member.name, 11.0, text_width),
        Rgb::BLACK,
    );
    y -= 15.0;

    let lines = [
        ("ID", member.membership_id.clone()),
        ("Type", member.membership_type.label().to_string()),
        ("Since", member.joined_on.format("%d %b %Y").to_string()),
        ("Valid till", member.validity()),
    ];
    for (label, value) in lines {
        canvas.text(Font::Bold, 7.0, PADDING, y, label, MUTED);
        canvas.text(
            Font::Regular,
            7.5,
            PADDING + 40.0,
            y,
            &fit_text(&value, 7.5, text_width - 40.0),
            Rgb::BLACK,
        );
        y -= 11.0;
    }

    draw_qr(
        &mut canvas,
        &qr_payload(member),
        CARD_WIDTH - PADDING - QR_SIZE,
        CARD_HEIGHT - BAND_HEIGHT - 8.0,
        QR_SIZE,
    )?;

    let contact = org.contact_line();
    if !contact.is_empty() {
        canvas.text_centered(
            Font::Regular,
            6.0,
            CARD_WIDTH / 2.0,
            8.0,
            &fit_text(&contact, 6.0, CARD_WIDTH - 2.0 * PADDING),
            MUTED,
        );
    }

    canvas.finish(&format!("Member ID Card {}", member.membership_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MemberStatus, MembershipType};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn member(valid_until: Option<NaiveDate>) -> Member {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        Member {
            id: Uuid::nil(),
            created_at: at,
            updated_at: at,
            name: "Ravi Kumar".to_string(),
            email: "ravi@example.org".to_string(),
            phone: "9876543210".to_string(),
            address: None,
            membership_type: MembershipType::General,
            membership_id: "MEM-2024-0A1B2C".to_string(),
            status: MemberStatus::Active,
            joined_on: at.date_naive(),
            valid_until,
            photo_url: None,
        }
    }

    #[test]
    fn test_qr_payload() {
        assert_eq!(qr_payload(&member(None)), "MEM-2024-0A1B2C|Ravi Kumar|-");
        assert_eq!(
            qr_payload(&member(NaiveDate::from_ymd_opt(2025, 1, 14))),
            "MEM-2024-0A1B2C|Ravi Kumar|2025-01-14"
        );
    }

    #[test]
    fn test_id_card_is_a_pdf() {
        let bytes = render_id_card(&member(None), &OrganizationProfile::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_id_card_is_deterministic() {
        let org = OrganizationProfile::default();
        let m = member(NaiveDate::from_ymd_opt(2025, 1, 14));
        assert_eq!(
            render_id_card(&m, &org).unwrap(),
            render_id_card(&m, &org).unwrap()
        );
    }

    #[test]
    fn test_qr_draws_dark_modules() {
        let mut canvas = Canvas::new(100.0, 100.0);
        draw_qr(&mut canvas, "MEM-1|A|-", 0.0, 100.0, 60.0).unwrap();
        // background plus at least the three finder patterns
        assert!(canvas.len() > 5 * 10);
    }
}
