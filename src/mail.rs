//! Sends a produced file as an e-mail attachment over implicit-TLS SMTP.
use crate::config::MailConfig;
use lettre::address::AddressError;
use lettre::message::header::ContentType;
use lettre::message::Attachment;
use lettre::message::Mailbox;
use lettre::message::MultiPart;
use lettre::message::SinglePart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::Message;
use lettre::SmtpTransport;
use lettre::Transport;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address '{0}': {1}")]
    InvalidAddress(String, AddressError),

    #[error("Read attachment '{path}' failed: {source}")]
    Attachment {
        path: String,
        source: std::io::Error,
    },

    #[error("Attachment path '{0}' has no file name")]
    InvalidAttachmentPath(String),

    #[error("Build message failed: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Invalid content type: {0}")]
    ContentType(String),

    #[error("Set up SMTP transport for '{0}' failed: {1}")]
    Transport(String, String),

    #[error("Send message failed: {0}")]
    Send(String),
}

/// Result of a delivery attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent { file: String, recipient: String },
    /// The server could not be reached; holds the reason.
    ConnectionFailed(String),
}

impl Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryOutcome::Sent { file, recipient } => write!(f, "File {file} sent to {recipient}."),
            DeliveryOutcome::ConnectionFailed(_) => f.write_str("Connection to server failed."),
        }
    }
}

/// Builds a message carrying `file` as attachment.
///
/// The subject is the file name and the plain text body announces the attachment.
pub fn build_message(config: &MailConfig, recipient: &str, file: &Path) -> Result<Message, MailError> {
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| MailError::InvalidAttachmentPath(file.display().to_string()))?;
    let content = std::fs::read(file).map_err(|source| MailError::Attachment {
        path: file.display().to_string(),
        source,
    })?;
    let content_type = ContentType::parse(ATTACHMENT_CONTENT_TYPE)
        .map_err(|error| MailError::ContentType(error.to_string()))?;

    let message = Message::builder()
        .from(parse_mailbox(&config.login.user)?)
        .to(parse_mailbox(recipient)?)
        .subject(file_name.as_str())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(format!("Sending {file_name} in the attachment.")))
                .singlepart(Attachment::new(file_name.to_owned()).body(content, content_type)),
        )?;
    Ok(message)
}

/// Sends a message through any transport.
pub fn deliver<T>(transport: &T, message: &Message, file: &str, recipient: &str) -> Result<DeliveryOutcome, MailError>
where
    T: Transport,
    T::Error: Display,
{
    transport
        .send(message)
        .map_err(|error| MailError::Send(error.to_string()))?;
    info!(file, recipient, "mail sent");
    Ok(DeliveryOutcome::Sent {
        file: file.to_owned(),
        recipient: recipient.to_owned(),
    })
}

/// Sends `file` to `recipient` with the configured SMTP account.
///
/// An unreachable server is reported as [`DeliveryOutcome::ConnectionFailed`];
/// any other failure is an error.
pub fn send_file(config: &MailConfig, recipient: &str, file: &Path) -> Result<DeliveryOutcome, MailError> {
    let message = build_message(config, recipient, file)?;
    let server = &config.server;
    let transport = SmtpTransport::relay(&server.smtp_server)
        .map_err(|error| MailError::Transport(server.smtp_server.to_owned(), error.to_string()))?
        .port(server.port)
        .credentials(Credentials::new(
            config.login.user.to_owned(),
            config.login.password.to_owned(),
        ))
        .build();

    debug!(server = %server.smtp_server, port = server.port, "connecting to smtp server");
    match transport.test_connection() {
        Ok(true) => (),
        Ok(false) => return Ok(connection_failed("server did not answer".to_owned())),
        Err(error) => return Ok(connection_failed(error.to_string())),
    }

    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    deliver(&transport, &message, &file_name, recipient)
}

fn connection_failed(reason: String) -> DeliveryOutcome {
    warn!(%reason, "connection to smtp server failed");
    DeliveryOutcome::ConnectionFailed(reason)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|error| MailError::InvalidAddress(address.to_owned(), error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoginConfig;
    use crate::config::ServerConfig;
    use lettre::transport::stub::StubTransport;

    fn config() -> MailConfig {
        MailConfig {
            login: LoginConfig {
                user: "sender@example.com".to_owned(),
                password: "secret".to_owned(),
            },
            server: ServerConfig {
                smtp_server: "smtp.example.com".to_owned(),
                port: 465,
            },
        }
    }

    fn attachment(directory: &Path) -> std::path::PathBuf {
        let path = directory.join("report.csv");
        std::fs::write(&path, "a,b\n1.0,2.0\n").unwrap();
        path
    }

    #[test]
    fn message_layout() {
        let directory = tempfile::tempdir().unwrap();
        let message = build_message(&config(), "boss@example.com", &attachment(directory.path())).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("From: sender@example.com"));
        assert!(formatted.contains("To: boss@example.com"));
        assert!(formatted.contains("Subject: report.csv"));
        assert!(formatted.contains("Sending report.csv in the attachment."));
        assert!(formatted.contains("Content-Type: application/octet-stream"));
        assert!(formatted.contains("filename=\"report.csv\""));
    }

    #[test]
    fn invalid_inputs() {
        let directory = tempfile::tempdir().unwrap();
        let file = attachment(directory.path());
        assert!(matches!(
            build_message(&config(), "not an address", &file),
            Err(MailError::InvalidAddress(..))
        ));
        assert!(matches!(
            build_message(&config(), "boss@example.com", &directory.path().join("missing.csv")),
            Err(MailError::Attachment { .. })
        ));
    }

    #[test]
    fn deliver_through_stub() {
        let directory = tempfile::tempdir().unwrap();
        let message = build_message(&config(), "boss@example.com", &attachment(directory.path())).unwrap();

        let transport = StubTransport::new_ok();
        let outcome = deliver(&transport, &message, "report.csv", "boss@example.com").unwrap();
        assert_eq!(outcome.to_string(), "File report.csv sent to boss@example.com.");
        assert_eq!(transport.messages().len(), 1);

        let failing = StubTransport::new_error();
        assert!(matches!(
            deliver(&failing, &message, "report.csv", "boss@example.com"),
            Err(MailError::Send(_))
        ));
    }

    #[test]
    fn connection_failure_message() {
        let outcome = DeliveryOutcome::ConnectionFailed("timed out".to_owned());
        assert_eq!(outcome.to_string(), "Connection to server failed.");
    }
}
