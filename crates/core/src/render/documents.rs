//! Letter layouts for offer, appointment and relieving letters.

use crate::letters::{AppointmentLetterFields, OfferLetterFields, RelievingLetterFields};
use crate::render::{file_stem, format_inr, Block, LetterDocument};
use crate::types::Date;

fn long_date(date: Date) -> String {
    date.format("%d %B %Y").to_string()
}

pub fn offer_letter_document(letter: &OfferLetterFields, company: &str) -> LetterDocument {
    let blocks = vec![
        Block::Paragraph(format!("Date: {}", long_date(letter.date_issued))),
        Block::Paragraph(format!("{}\n{}", letter.candidate_name, letter.candidate_address)),
        Block::Heading("Offer of Employment".into()),
        Block::Paragraph(format!("Dear {},", letter.candidate_name)),
        Block::Paragraph(format!(
            "We are pleased to offer you the position of {} at {company}. \
             Your annual cost to company will be INR {} ({}).",
            letter.position,
            format_inr(letter.ctc_amount),
            letter.ctc_in_words
        )),
        Block::KeyValue(vec![
            ("Position".into(), letter.position.clone()),
            ("Joining date".into(), long_date(letter.joining_date)),
            ("Reporting time".into(), letter.joining_time.clone()),
            (
                "Probation period".into(),
                format!("{} months", letter.probation_months),
            ),
        ]),
        Block::Heading("Salary Breakdown".into()),
        Block::SalaryTable(letter.salary_breakdown.clone()),
        Block::Paragraph(
            "Please confirm your acceptance of this offer by signing and returning a copy \
             of this letter."
                .into(),
        ),
        Block::Signature {
            name: company.to_string(),
            title: "Human Resources".into(),
        },
    ];
    LetterDocument {
        title: format!("Offer Letter - {}", letter.candidate_name),
        file_stem: file_stem(&["OfferLetter", &letter.candidate_name]),
        blocks,
    }
}

pub fn appointment_letter_document(letter: &AppointmentLetterFields, company: &str) -> LetterDocument {
    let blocks = vec![
        Block::Paragraph(format!("Date: {}", long_date(letter.appointment_date))),
        Block::Paragraph(format!("{}\n{}", letter.employee_name, letter.address)),
        Block::Heading("Letter of Appointment".into()),
        Block::Paragraph(format!("Dear {},", letter.employee_name)),
        Block::Paragraph(format!(
            "With reference to your application and subsequent interview, we are pleased to \
             appoint you as {} at {company} with effect from {}.",
            letter.designation,
            long_date(letter.joining_date)
        )),
        Block::Paragraph(format!(
            "Your annual cost to company is INR {} ({}), structured as below.",
            format_inr(letter.ctc_annual),
            letter.ctc_words
        )),
        Block::SalaryTable(letter.salary_breakdown.clone()),
        Block::Paragraph(
            "Your appointment is subject to the policies and rules of the company in force \
             from time to time."
                .into(),
        ),
        Block::Signature {
            name: letter.hr_name.clone(),
            title: letter.hr_designation.clone(),
        },
    ];
    LetterDocument {
        title: format!("Appointment Letter - {}", letter.employee_name),
        file_stem: file_stem(&["AppointmentLetter", &letter.employee_name]),
        blocks,
    }
}

pub fn relieving_letter_document(
    letter: &RelievingLetterFields,
    company: &str,
    issued_on: Date,
) -> LetterDocument {
    let blocks = vec![
        Block::Paragraph(format!("Date: {}", long_date(issued_on))),
        Block::Heading("Relieving Letter".into()),
        Block::KeyValue(vec![
            ("Employee name".into(), letter.employee_name.clone()),
            ("Employee ID".into(), letter.employee_id.clone()),
            ("Designation".into(), letter.designation.clone()),
        ]),
        Block::Paragraph(format!(
            "This is to certify that {} was employed with {company} as {} from {} to {}. \
             {} has been relieved of all duties with effect from the close of business on {}.",
            letter.employee_name,
            letter.designation,
            long_date(letter.joining_date),
            long_date(letter.relieving_date),
            letter.employee_name,
            long_date(letter.relieving_date)
        )),
        Block::Paragraph("We wish them every success in their future endeavours.".into()),
        Block::Signature {
            name: company.to_string(),
            title: "Human Resources".into(),
        },
    ];
    LetterDocument {
        title: format!("Relieving Letter - {}", letter.employee_name),
        file_stem: file_stem(&["RelievingLetter", &letter.employee_name]),
        blocks,
    }
}
