use crate::{
    db_types::{Course, Order, User},
    notifications::{EmailError, EmailMessage},
};

/// A payment confirmation, validated and ready to render.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    to: String,
    user_name: Option<String>,
    course_title: String,
    amount: String,
    order_id: String,
    payment_id: String,
    sender_name: String,
}

impl PaymentConfirmation {
    pub fn new(
        user: Option<&User>,
        course: Option<&Course>,
        order: &Order,
        sender_name: &str,
    ) -> Result<Self, EmailError> {
        let user = user.ok_or_else(|| EmailError::MissingData("User not found for payment confirmation".into()))?;
        let to = user
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| EmailError::MissingData("User email address is required to send payment confirmation".into()))?
            .to_string();
        let course_title = course
            .map(|c| c.title.trim())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| EmailError::MissingData("Course title is required to send payment confirmation".into()))?
            .to_string();
        let payment_id = order
            .gateway_payment_id
            .as_deref()
            .filter(|id| !id.is_empty() && !order.gateway_order_id.as_str().is_empty())
            .ok_or_else(|| EmailError::MissingData("Order identifiers are required to send payment confirmation".into()))?
            .to_string();
        let user_name = user.name.as_deref().map(str::trim).filter(|n| !n.is_empty()).map(String::from);
        Ok(Self {
            to,
            user_name,
            course_title,
            amount: format!("{} {}", order.currency.to_uppercase(), order.amount),
            order_id: order.gateway_order_id.to_string(),
            payment_id,
            sender_name: sender_name.to_string(),
        })
    }

    pub fn subject(&self) -> String {
        format!("Payment confirmed for {}", self.course_title)
    }

    fn greeting_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("there")
    }

    pub fn text(&self) -> String {
        [
            format!("Hi {},", self.greeting_name()),
            String::new(),
            format!("Thank you for your purchase. We have successfully received your payment for {}.", self.course_title),
            String::new(),
            format!("Amount: {}", self.amount),
            format!("Order ID: {}", self.order_id),
            format!("Payment ID: {}", self.payment_id),
            String::new(),
            "You can now access the course from your dashboard.".to_string(),
            String::new(),
            "Regards,".to_string(),
            self.sender_name.clone(),
        ]
        .join("\n")
    }

    pub fn html(&self) -> String {
        const CELL: &str = r#"style="padding: 8px; border: 1px solid #cbd5e1;""#;
        let row = |label: &str, value: &str| format!("<tr><td {CELL}>{label}</td><td {CELL}>{}</td></tr>", escape(value));
        format!(
            r#"<div style="font-family: Arial, Helvetica, sans-serif; line-height: 1.6; color: #1f2933;">
<h2 style="color: #0b7285;">Payment Confirmed</h2>
<p>Hi {name},</p>
<p>Thank you for your purchase. We have successfully received your payment for <strong>{title}</strong>.</p>
<table style="border-collapse: collapse; margin: 16px 0; width: 100%; max-width: 420px;"><tbody>
{amount}
{order}
{payment}
</tbody></table>
<p>You can now access the course from your dashboard.</p>
<p style="margin-top: 24px;">Regards,<br/>{sender}</p>
</div>"#,
            name = escape(self.greeting_name()),
            title = escape(&self.course_title),
            amount = row("Amount", &self.amount),
            order = row("Order ID", &self.order_id),
            payment = row("Payment ID", &self.payment_id),
            sender = escape(&self.sender_name),
        )
    }

    pub fn into_message(self) -> EmailMessage {
        EmailMessage { subject: self.subject(), html: self.html(), text: self.text(), to: self.to }
    }
}

fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c => result.push(c),
        }
    }
    result
}
