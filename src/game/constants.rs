/// The 33 letters of the Georgian alphabet, in dictionary order.
pub const ALPHABET: [char; 33] = [
    'ა', 'ბ', 'გ', 'დ', 'ე', 'ვ', 'ზ', 'თ', 'ი', 'კ', 'ლ', 'მ', 'ნ', 'ო', 'პ', 'ჟ', 'რ', 'ს',
    'ტ', 'უ', 'ფ', 'ქ', 'ღ', 'ყ', 'შ', 'ჩ', 'ც', 'ძ', 'წ', 'ჭ', 'ხ', 'ჯ', 'ჰ',
];

/// Categories every new room starts with.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "ქალაქი",
    "ქვეყანა",
    "ცხოველი",
    "მცენარე",
    "საჭმელი",
    "სახელი",
    "საგანი",
];

/// Pool the bonus category is drawn from when `useBonus` is enabled.
pub const BONUS_CATEGORIES: [&str; 8] = [
    "ფილმი",
    "პროფესია",
    "სპორტი",
    "ბრენდი",
    "მწერალი",
    "მომღერალი",
    "ფერი",
    "მანქანა",
];

/// Points for a valid answer nobody else gave.
pub const UNIQUE_ANSWER_POINTS: i32 = 20;

/// Points for a valid answer shared with at least one other player.
pub const DUPLICATE_ANSWER_POINTS: i32 = 10;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn alphabet_has_no_duplicates() {
        let unique: HashSet<char> = ALPHABET.iter().copied().collect();
        assert_eq!(unique.len(), ALPHABET.len());
    }
}
