use rand::Rng;
use rocket::http::{Cookie, CookieJar, SameSite};

const CHALLENGE_COOKIE: &str = "azad_challenge";

/// Arithmetic bot deterrent: "what is a + b?" with both operands in 1..=10.
/// Not a security boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub a: u32,
    pub b: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptchaFailure {
    NotChecked,
    Incorrect,
}

impl CaptchaFailure {
    pub fn message(&self) -> &'static str {
        match self {
            CaptchaFailure::NotChecked => "Please verify you're human.",
            CaptchaFailure::Incorrect => "Incorrect answer. Please try again.",
        }
    }
}

impl Challenge {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Challenge {
            a: rng.gen_range(1..=10),
            b: rng.gen_range(1..=10),
        }
    }

    pub fn answer(&self) -> u32 {
        self.a + self.b
    }

    /// Only the exact sum passes; blank, non-numeric or trailing junk fails.
    pub fn accepts(&self, input: &str) -> bool {
        let input = input.trim();
        !input.is_empty() && input.parse::<u32>().map(|n| n == self.answer()).unwrap_or(false)
    }

    pub(crate) fn encode(&self) -> String {
        format!("{}:{}", self.a, self.b)
    }

    pub(crate) fn decode(raw: &str) -> Option<Self> {
        let (a, b) = raw.split_once(':')?;
        let (a, b) = (a.parse().ok()?, b.parse().ok()?);
        if (1..=10).contains(&a) && (1..=10).contains(&b) {
            Some(Challenge { a, b })
        } else {
            None
        }
    }
}

/// Gate order: the box must be ticked, then the live challenge must accept the answer.
pub fn verify(
    challenge: Option<&Challenge>,
    checked: bool,
    answer: &str,
) -> Result<(), CaptchaFailure> {
    if !checked {
        return Err(CaptchaFailure::NotChecked);
    }
    match challenge {
        Some(c) if c.accepts(answer) => Ok(()),
        _ => Err(CaptchaFailure::Incorrect),
    }
}

/// Issue a fresh challenge and remember it in an encrypted cookie.
pub fn issue(cookies: &CookieJar<'_>) -> Challenge {
    let challenge = Challenge::generate();
    let cookie = Cookie::build((CHALLENGE_COOKIE, challenge.encode()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/");
    cookies.add_private(cookie);
    challenge
}

pub fn current(cookies: &CookieJar<'_>) -> Option<Challenge> {
    cookies
        .get_private(CHALLENGE_COOKIE)
        .and_then(|c| Challenge::decode(c.value()))
}
