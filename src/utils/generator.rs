use rand::seq::SliceRandom;
use rand::Rng;

const BOOK_REF_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const BOOK_REF_LEN: usize = 6;
pub const TICKET_NO_LEN: usize = 13;

/// Random booking reference, e.g. `"7QX2AB"`.
pub fn booking_reference() -> String {
    let mut rng = rand::thread_rng();
    (0..BOOK_REF_LEN)
        .map(|_| BOOK_REF_CHARSET[rng.gen_range(0..BOOK_REF_CHARSET.len())] as char)
        .collect()
}

/// Random 13-digit ticket number. Leading zeros are allowed.
pub fn ticket_number() -> String {
    let mut rng = rand::thread_rng();
    (0..TICKET_NO_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Pick one element uniformly at random.
pub fn pick<T: Clone>(items: &[T]) -> Option<T> {
    items.choose(&mut rand::thread_rng()).cloned()
}
