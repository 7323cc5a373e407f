//! CSV downloads for the users, rentals and transactions tables

use wheeladmin_utils::csv_field;

use crate::models::{display_date, Rental, Transaction, User};

pub const USERS_FILENAME: &str = "users.csv";
pub const RENTALS_FILENAME: &str = "rental_orders.csv";
pub const TRANSACTIONS_FILENAME: &str = "transaction.csv";

/// Build a CSV document from a header and rows of already-stringified cells
pub fn to_csv<I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut out = headers.iter().map(|h| csv_field(h)).collect::<Vec<_>>().join(",");
    out.push('\n');
    for row in rows {
        out.push_str(&row.iter().map(|cell| csv_field(cell)).collect::<Vec<_>>().join(","));
        out.push('\n');
    }
    out
}

pub fn users_csv(users: &[User]) -> String {
    to_csv(
        &["ID", "Name", "Email", "Status", "KYC_Status", "Registration_Date"],
        users.iter().map(|u| {
            vec![
                u.id.clone(),
                u.full_name(),
                u.email.clone(),
                u.status_label().to_string(),
                u.kyc_status.export_label().to_string(),
                u.registration_date(),
            ]
        }),
    )
}

pub fn rentals_csv(rentals: &[Rental]) -> String {
    to_csv(
        &["ID", "Wheelchair", "Start Date", "End Date", "Total Amount", "Status"],
        rentals.iter().map(|r| {
            vec![
                r.id.clone(),
                r.wheelchair_name().to_string(),
                display_date(r.rent_start_date.as_deref()),
                display_date(r.rent_end_date.as_deref()),
                r.total_amount.clone(),
                r.order_status.clone(),
            ]
        }),
    )
}

pub fn transactions_csv(transactions: &[Transaction]) -> String {
    to_csv(
        &["Id", "Amount", "Getway", "Status"],
        transactions.iter().map(|t| {
            vec![
                t.transaction_id.clone(),
                t.amount.clone(),
                t.payment_gateway.clone(),
                t.transaction_status.clone(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_users_csv() {
        let users: Vec<User> = serde_json::from_value(json!([{
            "id": 1,
            "first_name": "Rao,",
            "last_name": "Asha",
            "email": "asha@example.com",
            "account_status": "BLOCKED",
            "kyc_status": "ACCEPTED",
            "createdAt": "2024-03-05T10:15:00Z"
        }]))
        .unwrap();

        let csv = users_csv(&users);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ID,Name,Email,Status,KYC_Status,Registration_Date"));
        assert_eq!(
            lines.next(),
            Some("1,\"Rao, Asha\",asha@example.com,Inactive,Verified,2024-03-05")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_rentals_csv() {
        let rentals: Vec<Rental> = serde_json::from_value(json!([{
            "id": 5,
            "wheelchair": { "name": "Falcon" },
            "rent_start_date": "2024-01-02",
            "total_amount": "1500.00",
            "order_status": "Ongoing"
        }]))
        .unwrap();

        let csv = rentals_csv(&rentals);
        assert!(csv.starts_with("ID,Wheelchair,Start Date,End Date,Total Amount,Status\n"));
        assert!(csv.contains("5,Falcon,02-01-2024,-,1500.00,Ongoing"));
    }

    #[test]
    fn test_empty_transactions_csv_has_header() {
        assert_eq!(transactions_csv(&[]), "Id,Amount,Getway,Status\n");
    }

    #[test]
    fn test_quotes_are_doubled() {
        let csv = to_csv(&["a"], vec![vec!["say \"hi\"".to_string()]]);
        assert_eq!(csv, "a\n\"say \"\"hi\"\"\"\n");
    }
}
