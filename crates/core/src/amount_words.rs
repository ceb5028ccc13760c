//! Rupee amounts in words using the Indian numbering system
//! (crore, lakh, thousand).

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Words for 0 < n < 100.
fn two_digits(n: u64, out: &mut Vec<&'static str>) {
    if n < 20 {
        out.push(ONES[n as usize]);
    } else {
        out.push(TENS[(n / 10) as usize]);
        if n % 10 != 0 {
            out.push(ONES[(n % 10) as usize]);
        }
    }
}

/// Words for 0 < n < 1000.
fn three_digits(n: u64, out: &mut Vec<&'static str>) {
    if n >= 100 {
        out.push(ONES[(n / 100) as usize]);
        out.push("Hundred");
    }
    if n % 100 != 0 {
        two_digits(n % 100, out);
    }
}

fn words(n: u64, out: &mut Vec<&'static str>) {
    let crore = n / 10_000_000;
    let rest = n % 10_000_000;
    if crore > 0 {
        // Amounts beyond 99 crore recurse on the crore count.
        if crore >= 100 {
            words(crore, out);
        } else {
            two_digits(crore, out);
        }
        out.push("Crore");
    }
    let lakh = rest / 100_000;
    if lakh > 0 {
        two_digits(lakh, out);
        out.push("Lakh");
    }
    let thousand = (rest % 100_000) / 1_000;
    if thousand > 0 {
        two_digits(thousand, out);
        out.push("Thousand");
    }
    let hundreds = rest % 1_000;
    if hundreds > 0 {
        three_digits(hundreds, out);
    }
}

/// `600000` -> `"Six Lakh Rupees Only"`.
pub fn amount_in_words(amount: i64) -> String {
    if amount == 0 {
        return "Zero Rupees Only".to_string();
    }
    let mut out = Vec::new();
    if amount < 0 {
        out.push("Minus");
    }
    words(amount.unsigned_abs(), &mut out);
    format!("{} Rupees Only", out.join(" "))
}
