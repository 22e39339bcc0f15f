//! Canned console payloads.
//!
//! Payload bodies live under `tests/fixtures/` and mirror what the console
//! sends: underscore-prefixed JSON and `ArrayOf<T>` XML.

use school_console::HttpResponse;

/// Read a fixture file as text.
pub fn load_fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {}", path))
}

/// Successful login: 200 on a kept-alive connection.
pub fn login_accepted() -> HttpResponse {
    HttpResponse::new(200, "")
        .with_header("Connection", "keep-alive")
        .with_header("Set-Cookie", "ConsoleSession=abc123; Path=/; HttpOnly")
}

/// The console answers 200 but closes the connection on a bad password.
pub fn login_closed() -> HttpResponse {
    HttpResponse::new(200, "").with_header("Connection", "close")
}

pub fn json(name: &str) -> HttpResponse {
    HttpResponse::new(200, load_fixture(name)).with_header("Content-Type", "application/json")
}

pub fn xml(name: &str) -> HttpResponse {
    HttpResponse::new(200, load_fixture(name)).with_header("Content-Type", "application/xml")
}

pub fn ok() -> HttpResponse {
    HttpResponse::new(200, "")
}

pub fn status(code: u16) -> HttpResponse {
    HttpResponse::new(code, "")
}

/// A roster document with the given usernames.
pub fn roster_with(usernames: &[&str]) -> String {
    let students: String = usernames
        .iter()
        .map(|u| {
            format!(
                "<Student><DistinguishedName>CN={u},OU=Students</DistinguishedName>\
                 <UserName>{u}</UserName><FirstName>First</FirstName><LastName>{u}</LastName>\
                 <Disabled>false</Disabled></Student>"
            )
        })
        .collect();
    format!("<ArrayOfStudent>{}</ArrayOfStudent>", students)
}
