use crate::http::request::Request;

/// Largest request head accepted before the connection is dropped.
pub const MAX_HEAD_SIZE: usize = 16 * 1024;

/// Parses a buffered request head.
///
/// Never fails: a request line with fewer than two tokens yields an empty
/// method and target, and header lines without a colon are skipped. Lines
/// end in CRLF, with bare LF accepted.
pub fn parse_http_request(buf: &[u8]) -> Request {
    let text = String::from_utf8_lossy(buf);
    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

    let mut request = Request::default();

    // Request line
    if let Some(request_line) = lines.next() {
        let parts: Vec<&str> = request_line.split_whitespace().collect();
        if parts.len() >= 2 {
            request.method = parts[0].to_string();
            request.target = parts[1].to_string();
            request.version = parts.get(2).map(|v| v.to_string()).unwrap_or_default();
        }
    }

    // Headers
    for line in lines {
        if line.is_empty() {
            break;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        request.headers.push((
            format!("{}:", key.to_ascii_lowercase()),
            value.trim().to_string(),
        ));
    }

    request
}

/// Finds the end of the request head.
///
/// Returns the number of bytes up to and including the blank line
/// (`\r\n\r\n` or `\n\n`), or `None` if the head is not complete yet.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    for (i, &byte) in buf.iter().enumerate() {
        if byte != b'\n' {
            continue;
        }
        match &buf[i + 1..] {
            [b'\n', ..] => return Some(i + 2),
            [b'\r', b'\n', ..] => return Some(i + 3),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_http_request(req);

        assert_eq!(parsed.target, "/");
        assert_eq!(parsed.header("host"), Some("example.com"));
        assert_eq!(find_headers_end(req), Some(req.len()));
    }

    #[test]
    fn headers_end_with_bare_lf() {
        let req = b"GET / HTTP/1.1\nHost: x\n\nrest";
        assert_eq!(find_headers_end(req), Some(req.len() - 4));
    }
}
