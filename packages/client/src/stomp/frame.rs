//! STOMP 1.2 text frame codec.
//!
//! ```text
//! COMMAND\n
//! header1:value1\n
//! header2:value2\n
//! \n
//! body^@
//! ```
//!
//! Header values are escaped (`\\`, `\n`, `\r`, `\c`) except on `CONNECT`
//! and `CONNECTED` frames. Bare EOLs between frames are heart-beats.

use thiserror::Error;

/// Frame decoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("unknown STOMP command '{0}'")]
    UnknownCommand(String),

    #[error("frame ended before the header block was complete")]
    Truncated,

    #[error("malformed header line '{0}'")]
    MalformedHeader(String),

    #[error("invalid escape sequence in header '{0}'")]
    InvalidEscape(String),

    #[error("invalid content-length '{0}'")]
    InvalidContentLength(String),

    #[error("frame body is not NUL-terminated")]
    Unterminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Stomp,
    Connected,
    Subscribe,
    Unsubscribe,
    Send,
    Message,
    Receipt,
    Error,
    Disconnect,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Stomp => "STOMP",
            Command::Connected => "CONNECTED",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Send => "SEND",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
            Command::Disconnect => "DISCONNECT",
        }
    }

    fn parse(line: &str) -> Result<Self, FrameError> {
        match line {
            "CONNECT" => Ok(Command::Connect),
            "STOMP" => Ok(Command::Stomp),
            "CONNECTED" => Ok(Command::Connected),
            "SUBSCRIBE" => Ok(Command::Subscribe),
            "UNSUBSCRIBE" => Ok(Command::Unsubscribe),
            "SEND" => Ok(Command::Send),
            "MESSAGE" => Ok(Command::Message),
            "RECEIPT" => Ok(Command::Receipt),
            "ERROR" => Ok(Command::Error),
            "DISCONNECT" => Ok(Command::Disconnect),
            other => Err(FrameError::UnknownCommand(other.to_string())),
        }
    }

    /// CONNECT and CONNECTED frames carry headers verbatim
    fn escapes_headers(&self) -> bool {
        !matches!(self, Command::Connect | Command::Connected)
    }
}

/// A single STOMP frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// First value of a header; repeated headers keep the first occurrence
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    // ========================================
    // Client frames
    // ========================================

    pub fn connect(host: &str) -> Self {
        Frame::new(Command::Connect)
            .with_header("accept-version", "1.2,1.1,1.0")
            .with_header("host", host)
            .with_header("heart-beat", "0,0")
    }

    pub fn subscribe(id: &str, destination: &str) -> Self {
        Frame::new(Command::Subscribe)
            .with_header("id", id)
            .with_header("destination", destination)
            .with_header("ack", "auto")
    }

    pub fn unsubscribe(id: &str) -> Self {
        Frame::new(Command::Unsubscribe).with_header("id", id)
    }

    pub fn send(destination: &str, json_body: &str) -> Self {
        Frame::new(Command::Send)
            .with_header("destination", destination)
            .with_header("content-type", "application/json")
            .with_header("content-length", &json_body.len().to_string())
            .with_body(json_body)
    }

    pub fn disconnect() -> Self {
        Frame::new(Command::Disconnect)
    }

    // ========================================
    // Codec
    // ========================================

    /// Serialize the frame, including the trailing NUL
    pub fn encode(&self) -> String {
        let escape = self.command.escapes_headers();
        let mut out = String::with_capacity(self.body.len() + 64);
        out.push_str(self.command.as_str());
        out.push('\n');
        for (name, value) in &self.headers {
            if escape {
                out.push_str(&escape_header(name));
                out.push(':');
                out.push_str(&escape_header(value));
            } else {
                out.push_str(name);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Parse one frame from a text message
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - the text only contained heart-beat EOLs
    /// * `Ok(Some(frame))` - a complete frame
    pub fn decode(text: &str) -> Result<Option<Frame>, FrameError> {
        let text = text.trim_start_matches(['\r', '\n']);
        if text.is_empty() || text == "\0" {
            return Ok(None);
        }

        let (command_line, mut rest) = split_line(text)?;
        let command = Command::parse(command_line)?;
        let unescape = command.escapes_headers();

        let mut headers = Vec::new();
        loop {
            let (line, after) = split_line(rest)?;
            rest = after;
            if line.is_empty() {
                break;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| FrameError::MalformedHeader(line.to_string()))?;
            if unescape {
                headers.push((unescape_header(name)?, unescape_header(value)?));
            } else {
                headers.push((name.to_string(), value.to_string()));
            }
        }

        let frame = Frame {
            command,
            headers,
            body: String::new(),
        };

        let body = match frame.header("content-length") {
            Some(raw) => {
                let length: usize = raw
                    .trim()
                    .parse()
                    .map_err(|_| FrameError::InvalidContentLength(raw.to_string()))?;
                let body = rest
                    .get(..length)
                    .ok_or_else(|| FrameError::InvalidContentLength(raw.to_string()))?;
                if !rest[length..].starts_with('\0') {
                    return Err(FrameError::Unterminated);
                }
                body
            }
            None => {
                let end = rest.find('\0').ok_or(FrameError::Unterminated)?;
                &rest[..end]
            }
        };

        Ok(Some(Frame {
            body: body.to_string(),
            ..frame
        }))
    }
}

fn split_line(text: &str) -> Result<(&str, &str), FrameError> {
    let end = text.find('\n').ok_or(FrameError::Truncated)?;
    let line = text[..end].strip_suffix('\r').unwrap_or(&text[..end]);
    Ok((line, &text[end + 1..]))
}

fn escape_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_header(raw: &str) -> Result<String, FrameError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            _ => return Err(FrameError::InvalidEscape(raw.to_string())),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_send_frame() {
        // テスト項目: SEND フレームが宛先・content-length・NUL 終端付きで出力される
        // given (前提条件):
        let frame = Frame::send("/app/send-message/room1", r#"{"message":"hi"}"#);

        // when (操作):
        let encoded = frame.encode();

        // then (期待する結果):
        assert_eq!(
            encoded,
            "SEND\ndestination:/app/send-message/room1\ncontent-type:application/json\n\
             content-length:16\n\n{\"message\":\"hi\"}\0"
        );
    }

    #[test]
    fn test_encode_connect_keeps_headers_verbatim() {
        // テスト項目: CONNECT フレームのヘッダーはエスケープされない
        // given (前提条件):
        let frame = Frame::connect("localhost:8080");

        // when (操作):
        let encoded = frame.encode();

        // then (期待する結果):
        assert!(encoded.starts_with("CONNECT\n"));
        assert!(encoded.contains("host:localhost:8080\n"));
        assert!(encoded.contains("heart-beat:0,0\n"));
    }

    #[test]
    fn test_encode_escapes_colon_in_destination() {
        // テスト項目: CONNECT 以外のフレームではヘッダー値のコロンがエスケープされる
        // given (前提条件):
        let frame = Frame::subscribe("sub-0", "/topic/room/a:b");

        // when (操作):
        let encoded = frame.encode();

        // then (期待する結果):
        assert!(encoded.contains("destination:/topic/room/a\\cb\n"));
    }

    #[test]
    fn test_decode_spring_message_frame() {
        // テスト項目: ブローカーからの MESSAGE フレームが解析される
        // given (前提条件):
        let text = "MESSAGE\ndestination:/topic/room/room1\ncontent-type:application/json\n\
                    subscription:sub-0\nmessage-id:abc-1\ncontent-length:17\n\n{\"message\":\"hey\"}\0";

        // when (操作):
        let frame = Frame::decode(text).unwrap().unwrap();

        // then (期待する結果):
        assert_eq!(frame.command, Command::Message);
        assert_eq!(frame.header("subscription"), Some("sub-0"));
        assert_eq!(frame.header("destination"), Some("/topic/room/room1"));
        assert_eq!(frame.body, "{\"message\":\"hey\"}");
    }

    #[test]
    fn test_decode_crlf_and_unescape() {
        // テスト項目: CRLF 改行とエスケープされたヘッダー値が扱える
        // given (前提条件):
        let text = "ERROR\r\nmessage:bad\\cframe\\nsecond line\r\n\r\ndetails\0";

        // when (操作):
        let frame = Frame::decode(text).unwrap().unwrap();

        // then (期待する結果):
        assert_eq!(frame.command, Command::Error);
        assert_eq!(frame.header("message"), Some("bad:frame\nsecond line"));
        assert_eq!(frame.body, "details");
    }

    #[test]
    fn test_decode_heartbeat_is_none() {
        // テスト項目: ハートビート（改行のみ）は None になる
        // given (前提条件):
        let text = "\n";

        // when (操作):
        let result = Frame::decode(text);

        // then (期待する結果):
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_decode_repeated_header_keeps_first() {
        // テスト項目: 同じヘッダーが複数ある場合、最初の値が使われる
        // given (前提条件):
        let text = "MESSAGE\nfoo:first\nfoo:second\n\n\0";

        // when (操作):
        let frame = Frame::decode(text).unwrap().unwrap();

        // then (期待する結果):
        assert_eq!(frame.header("foo"), Some("first"));
        assert_eq!(frame.body, "");
    }

    #[test]
    fn test_decode_content_length_allows_nul_in_body() {
        // テスト項目: content-length がある場合、本文中の NUL も本文として扱われる
        // given (前提条件):
        let text = "MESSAGE\ncontent-length:3\n\na\0b\0";

        // when (操作):
        let frame = Frame::decode(text).unwrap().unwrap();

        // then (期待する結果):
        assert_eq!(frame.body, "a\0b");
    }

    #[test]
    fn test_decode_errors() {
        // テスト項目: 不正なフレームはそれぞれのエラーになる
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(
            Frame::decode("HELLO\n\n\0"),
            Err(FrameError::UnknownCommand("HELLO".to_string()))
        );
        assert_eq!(Frame::decode("MESSAGE\nfoo:bar"), Err(FrameError::Truncated));
        assert_eq!(
            Frame::decode("MESSAGE\nno-colon\n\n\0"),
            Err(FrameError::MalformedHeader("no-colon".to_string()))
        );
        assert_eq!(
            Frame::decode("MESSAGE\nfoo:a\\tb\n\n\0"),
            Err(FrameError::InvalidEscape("a\\tb".to_string()))
        );
        assert_eq!(
            Frame::decode("MESSAGE\n\nbody without nul"),
            Err(FrameError::Unterminated)
        );
        assert_eq!(
            Frame::decode("MESSAGE\ncontent-length:99\n\nshort\0"),
            Err(FrameError::InvalidContentLength("99".to_string()))
        );
    }
}
