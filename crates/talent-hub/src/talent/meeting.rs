use rand::Rng;

const ALPHABET: &[u8] = b"abcdefn12356hjlqstv89";
const TOKEN_LENGTH: usize = 20;

/// Join and host links for an online interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingLinks {
    pub join_url: String,
    pub start_url: String,
}

/// Mints meeting links under a fixed provider base URL.
#[derive(Debug, Clone)]
pub struct MeetingLinkFactory {
    base_url: String,
}

impl MeetingLinkFactory {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn create(&self) -> MeetingLinks {
        let mut rng = rand::thread_rng();
        let meeting_id = token(&mut rng);
        let host_key = token(&mut rng);
        MeetingLinks {
            join_url: format!("{}/j/{meeting_id}", self.base_url),
            start_url: format!("{}/s/{meeting_id}?zak={host_key}", self.base_url),
        }
    }
}

fn token<R: Rng>(rng: &mut R) -> String {
    (0..TOKEN_LENGTH)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}
