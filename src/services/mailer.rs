use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::users;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub subject: String,
    pub sender: String,
    pub recipients: Vec<String>,
    pub text_body: String,
}

//trait = canal d'envoi des emails (SMTP ou autre à brancher ici)
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), AppError>;
}

/// Mailer par défaut: écrit le message dans les logs au lieu de l'envoyer
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), AppError> {
        tracing::info!(
            subject = %message.subject,
            sender = %message.sender,
            recipients = ?message.recipients,
            "outgoing email\n{}",
            message.text_body
        );
        Ok(())
    }
}

/// Email de reset password contenant le token
pub fn password_reset_email(sender: &str, user: &users::Model, token: &str) -> EmailMessage {
    EmailMessage {
        subject: "[Microblog] Reset Your Password".to_string(),
        sender: sender.to_string(),
        recipients: vec![user.email.clone()],
        text_body: format!(
            "Dear {},\n\n\
             To reset your password use the following token:\n\n\
             {}\n\n\
             If you have not requested a password reset simply ignore this message.\n\n\
             Sincerely,\n\n\
             The Microblog Team\n",
            user.username, token
        ),
    }
}
