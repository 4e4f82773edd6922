use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "flash";
const FLASH_MAX_AGE_SECS: i64 = 60;

pub fn set(jar: CookieJar, message: &str) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, urlencoding::encode(message).into_owned()))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(FLASH_MAX_AGE_SECS));
    jar.add(cookie)
}

/// Reads the pending notice, if any, and clears it.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar
        .get(FLASH_COOKIE)
        .and_then(|c| urlencoding::decode(c.value()).ok().map(|s| s.into_owned()))
        .filter(|s| !s.is_empty());

    match message {
        Some(_) => (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), message),
        None => (jar, None),
    }
}
