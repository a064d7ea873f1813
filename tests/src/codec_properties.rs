//! Property tests for the codec and symbol table

#[cfg(test)]
mod tests {
    use morse_core::{decode, encode, looks_like_morse, MappingPolicy, SymbolStats, SymbolTable};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn single_character_round_trips(index in 0usize..36) {
            let table = SymbolTable::new();
            let (c, code) = table.entries()[index];
            let morse = encode(&table, &c.to_string());
            prop_assert_eq!(morse.as_str(), code);
            prop_assert_eq!(decode(&table, morse.as_str()), c.to_string());
        }

        #[test]
        fn mapped_text_round_trips_uppercased(text in "[a-zA-Z0-9]{1,8}( [a-zA-Z0-9]{1,8}){0,3}") {
            let table = SymbolTable::new();
            let morse = encode(&table, &text);
            prop_assert_eq!(decode(&table, morse.as_str()), text.to_uppercase());
        }

        #[test]
        fn encoded_output_is_detected_as_morse(text in "[a-zA-Z0-9 ]{0,24}") {
            let table = SymbolTable::new();
            let morse = encode(&table, &text);
            prop_assert!(looks_like_morse(morse.as_str(), table.separator()));
        }

        #[test]
        fn stats_count_every_symbol(text in "[a-z ]{0,24}") {
            let table = SymbolTable::new();
            let morse = encode(&table, &text);
            let stats = SymbolStats::count(morse.as_str());
            let symbols = morse.as_str().chars().filter(|c| *c == '.' || *c == '-').count();
            prop_assert_eq!(stats.dots + stats.dashes, symbols);
        }

        #[test]
        fn reversing_twice_is_identity(text in "[a-z0-9 ]{0,16}") {
            let table = SymbolTable::new();
            let morse = encode(&table, &text);
            prop_assert_eq!(morse.reversed().reversed(), morse);
        }
    }

    #[test]
    fn replaced_mapping_stays_bijective() {
        let mut table = SymbolTable::new();
        table.insert('!', "...", MappingPolicy::Replace).unwrap();
        table.insert('?', "..--..", MappingPolicy::Reject).unwrap_err();
        for (c, code) in table.entries() {
            assert_eq!(table.char_for(code), Some(c));
        }
        assert_eq!(decode(&table, "..."), "!");
        assert_eq!(encode(&table, "s").as_str(), "?");
    }

    #[test]
    fn custom_separator_round_trip() {
        let table = SymbolTable::with_separator('|').unwrap();
        let morse = encode(&table, "hi there");
        assert_eq!(morse.as_str(), ".... .. | - .... . .-. .");
        assert_eq!(decode(&table, morse.as_str()), "HI THERE");
        assert!(looks_like_morse(morse.as_str(), '|'));
        assert!(!looks_like_morse(morse.as_str(), '/'));
    }
}
