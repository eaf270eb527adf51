use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Nicknames and spelling variants, keyed by lower-case first name.
    static ref NAME_VARIATIONS: HashMap<&'static str, &'static [&'static str]> = {
        let entries: &[(&str, &[&str])] = &[
            ("philip", &["phillip", "filip", "phil"]),
            ("phillip", &["philip", "filip", "phil"]),
            ("filip", &["philip", "phillip", "phil"]),
            ("phil", &["philip", "phillip", "filip"]),
            ("catherine", &["katherine", "kathryn", "cathy", "kate", "katie", "cat"]),
            ("katherine", &["catherine", "kathryn", "kathy", "kate", "katie", "kat"]),
            ("kathryn", &["catherine", "katherine", "kathy", "kate", "katie"]),
            ("cathy", &["catherine", "kathy", "kate"]),
            ("kathy", &["katherine", "kathryn", "cathy", "kate"]),
            ("kate", &["katherine", "kathryn", "catherine", "katie", "cathy"]),
            ("katie", &["katherine", "kathryn", "catherine", "kate"]),
            ("john", &["jon", "johnny", "johnathan", "jonathan", "jack"]),
            ("jon", &["john", "johnny", "johnathan", "jonathan"]),
            ("johnny", &["john", "jon"]),
            ("johnathan", &["john", "jon", "jonathan"]),
            ("jonathan", &["john", "jon", "johnathan"]),
            ("jack", &["john", "jackson"]),
            ("michael", &["mike", "mick", "mickey", "mikey"]),
            ("mike", &["michael", "mick"]),
            ("mick", &["michael", "mike"]),
            ("mickey", &["michael", "mike"]),
            ("mikey", &["michael", "mike"]),
            ("william", &["bill", "will", "billy", "willy", "willie"]),
            ("bill", &["william", "billy"]),
            ("will", &["william", "willy", "willie"]),
            ("billy", &["william", "bill"]),
            ("willy", &["william", "will", "willie"]),
            ("willie", &["william", "will", "willy"]),
            ("robert", &["rob", "bob", "robbie", "bobby", "bert"]),
            ("rob", &["robert", "robbie"]),
            ("bob", &["robert", "bobby"]),
            ("robbie", &["robert", "rob"]),
            ("bobby", &["robert", "bob"]),
            ("bert", &["robert", "albert"]),
            ("richard", &["rick", "dick", "rich", "richie", "ricky"]),
            ("rick", &["richard", "ricky"]),
            ("dick", &["richard"]),
            ("rich", &["richard", "richie"]),
            ("richie", &["richard", "rich"]),
            ("ricky", &["richard", "rick"]),
            ("christopher", &["chris", "christy", "christie"]),
            ("chris", &["christopher", "christian", "christine"]),
            ("christy", &["christopher", "christie"]),
            ("christie", &["christopher", "christy"]),
            ("nicholas", &["nick", "nicky", "nicolas"]),
            ("nick", &["nicholas", "nicky"]),
            ("nicky", &["nicholas", "nick"]),
            ("nicolas", &["nicholas", "nick"]),
            ("anthony", &["tony", "anton"]),
            ("tony", &["anthony", "antonio"]),
            ("anton", &["anthony", "antonio"]),
            ("antonio", &["anthony", "tony", "anton"]),
            ("matthew", &["matt", "matty"]),
            ("matt", &["matthew", "matty"]),
            ("matty", &["matthew", "matt"]),
            ("andrew", &["andy", "drew"]),
            ("andy", &["andrew", "anderson"]),
            ("drew", &["andrew"]),
            ("daniel", &["dan", "danny", "dane"]),
            ("dan", &["daniel", "danny"]),
            ("danny", &["daniel", "dan"]),
            ("dane", &["daniel"]),
            ("david", &["dave", "davey", "davy"]),
            ("dave", &["david", "davey"]),
            ("davey", &["david", "dave", "davy"]),
            ("davy", &["david", "davey"]),
            ("elizabeth", &["liz", "beth", "betsy", "betty", "eliza", "lisa"]),
            ("liz", &["elizabeth", "lisa"]),
            ("beth", &["elizabeth", "bethany"]),
            ("betsy", &["elizabeth", "betty"]),
            ("betty", &["elizabeth", "betsy"]),
            ("eliza", &["elizabeth"]),
            ("lisa", &["elizabeth", "liz"]),
            ("jennifer", &["jen", "jenny", "jenn"]),
            ("jen", &["jennifer", "jenny"]),
            ("jenny", &["jennifer", "jen"]),
            ("jenn", &["jennifer", "jen"]),
            ("jessica", &["jess", "jessie"]),
            ("jess", &["jessica", "jessie"]),
            ("jessie", &["jessica", "jess"]),
            ("james", &["jim", "jimmy", "jamie"]),
            ("jim", &["james", "jimmy"]),
            ("jimmy", &["james", "jim"]),
            ("jamie", &["james"]),
            ("joseph", &["joe", "joey", "jos"]),
            ("joe", &["joseph", "joey"]),
            ("joey", &["joseph", "joe"]),
            ("jos", &["joseph"]),
            ("thomas", &["tom", "tommy", "thom"]),
            ("tom", &["thomas", "tommy"]),
            ("tommy", &["thomas", "tom"]),
            ("thom", &["thomas"]),
            ("charles", &["charlie", "chuck", "chas"]),
            ("charlie", &["charles", "charlotte"]),
            ("chuck", &["charles"]),
            ("chas", &["charles"]),
            ("patricia", &["pat", "patty", "trish", "patsy"]),
            ("pat", &["patricia", "patrick", "patty"]),
            ("patty", &["patricia", "pat"]),
            ("trish", &["patricia"]),
            ("patsy", &["patricia"]),
            ("patrick", &["pat", "paddy", "rick"]),
            ("paddy", &["patrick"]),
            ("alexander", &["alex", "xander", "sandy"]),
            ("alex", &["alexander", "alexandra", "alexis"]),
            ("xander", &["alexander"]),
            ("sandy", &["alexander", "sandra"]),
            ("benjamin", &["ben", "benny", "benji"]),
            ("ben", &["benjamin", "benny"]),
            ("benny", &["benjamin", "ben"]),
            ("benji", &["benjamin"]),
            ("gregory", &["greg", "gregg"]),
            ("greg", &["gregory", "gregg"]),
            ("gregg", &["gregory", "greg"]),
            ("joshua", &["josh"]),
            ("josh", &["joshua"]),
            ("steven", &["steve", "stevie"]),
            ("stephen", &["steve", "stevie"]),
            ("steve", &["steven", "stephen", "stevie"]),
            ("stevie", &["steven", "stephen", "steve"]),
            ("timothy", &["tim", "timmy"]),
            ("tim", &["timothy", "timmy"]),
            ("timmy", &["timothy", "tim"]),
            ("edward", &["ed", "eddie", "ted"]),
            ("ed", &["edward", "eddie"]),
            ("eddie", &["edward", "ed"]),
            ("ted", &["edward", "theodore"]),
            ("ronald", &["ron", "ronnie"]),
            ("ron", &["ronald", "ronnie"]),
            ("ronnie", &["ronald", "ron"]),
            ("harley", &["harv"]),
            ("harv", &["harley"]),
            ("martha", &["mattie"]),
            ("mattie", &["martha"]),
            ("wesley", &["wes"]),
            ("wes", &["wesley"]),
        ];
        entries.iter().copied().collect()
    };

    /// Athletes who have competed under more than one name.
    static ref ATHLETE_NAME_CHANGES: HashMap<&'static str, &'static [&'static str]> = {
        let entries: &[(&str, &[&str])] = &[
            ("kate nye", &["katherine vibert"]),
            ("katherine vibert", &["kate nye"]),
        ];
        entries.iter().copied().collect()
    };
}

/// The token itself followed by its known variants.
pub fn name_variations(token: &str) -> Vec<String> {
    let cleaned = token.trim().to_lowercase();
    let mut variations = vec![cleaned.clone()];
    if let Some(alternatives) = NAME_VARIATIONS.get(cleaned.as_str()) {
        variations.extend(alternatives.iter().map(|alt| alt.to_string()));
    }
    variations
}

/// Whether `athlete_name` matches a free-text search.
///
/// A query naming an athlete who changed names matches either name.
/// Otherwise every whitespace separated token must appear in the name,
/// directly or through one of its nickname variants.
pub fn matches_athlete_name(athlete_name: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    if athlete_name.is_empty() {
        return false;
    }

    let name = athlete_name.to_lowercase();

    if let Some(mapped) = ATHLETE_NAME_CHANGES.get(query.as_str())
        && mapped.iter().any(|other| name.contains(other))
    {
        return true;
    }

    query.split_whitespace().all(|token| {
        name_variations(token)
            .iter()
            .any(|variant| name.contains(variant.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_expansion_requires_every_token() {
        assert!(matches_athlete_name("William Smith", "bill smith"));
        assert!(!matches_athlete_name("William Jones", "bill smith"));
    }

    #[test]
    fn test_name_change_mapping() {
        assert!(matches_athlete_name("Katherine Vibert", "Kate Nye"));
        assert!(matches_athlete_name("Kate Nye", "katherine vibert"));
    }

    #[test]
    fn test_substring_and_case() {
        assert!(matches_athlete_name("Mattie Rogers", "ROG"));
        assert!(matches_athlete_name("Mattie Rogers", "martha"));
        assert!(!matches_athlete_name("", "anyone"));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(matches_athlete_name("Anyone", ""));
        assert!(matches_athlete_name("Anyone", "   "));
    }

    #[test]
    fn test_variations_include_original() {
        let variations = name_variations("Phil");
        assert_eq!(variations[0], "phil");
        assert!(variations.contains(&"philip".to_string()));
        assert_eq!(name_variations("zed"), vec!["zed".to_string()]);
    }
}
