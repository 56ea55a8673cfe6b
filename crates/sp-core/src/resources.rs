//! Learning resource recommendations.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Known topics and their resources, matched in this order.
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Mathematics",
        &[
            "https://www.khanacademy.org/math",
            "https://www.wolframalpha.com/",
        ],
    ),
    (
        "Machine Learning",
        &[
            "https://www.coursera.org/learn/machine-learning",
            "https://developers.google.com/machine-learning/crash-course",
        ],
    ),
    (
        "Statistics",
        &[
            "https://www.khanacademy.org/math/statistics-probability",
            "https://www.statlearning.com/",
        ],
    ),
    (
        "Python",
        &["https://www.learnpython.org/", "https://realpython.com/"],
    ),
    (
        "Data Science",
        &["https://www.datacamp.com/", "https://www.kaggle.com/learn"],
    ),
    (
        "Physics",
        &[
            "https://www.khanacademy.org/science/physics",
            "https://phet.colorado.edu/",
        ],
    ),
    (
        "Chemistry",
        &[
            "https://www.khanacademy.org/science/chemistry",
            "https://www.chemguide.co.uk/",
        ],
    ),
    (
        "Biology",
        &[
            "https://www.khanacademy.org/science/biology",
            "https://www.biologycorner.com/",
        ],
    ),
];

/// A recommended resource for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub subject: String,
    pub url: String,
}

fn find_entry(subject: &str) -> Option<&'static (&'static str, &'static [&'static str])> {
    let subject = subject.to_lowercase();
    CATALOG.iter().find(|(topic, _)| {
        let topic = topic.to_lowercase();
        topic.contains(&subject) || subject.contains(&topic)
    })
}

/// Returns the catalog topic matching `subject`, if any.
///
/// A topic matches when either lowercased name contains the other. The
/// first matching topic in catalog order wins.
pub fn match_topic(subject: &str) -> Option<&'static str> {
    find_entry(subject).map(|(topic, _)| *topic)
}

fn search_url(subject: &str) -> String {
    format!(
        "https://www.google.com/search?q={}+learning+resources",
        subject.replace(' ', "+")
    )
}

/// Recommends one resource per subject, in input order.
pub fn recommend_resources<R, S>(subjects: &[S], rng: &mut R) -> Vec<Recommendation>
where
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    subjects
        .iter()
        .map(|subject| {
            let subject = subject.as_ref();
            let url = match find_entry(subject).and_then(|(_, urls)| urls.choose(&mut *rng)) {
                Some(url) => (*url).to_string(),
                None => search_url(subject),
            };
            Recommendation {
                subject: subject.to_string(),
                url,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn matching_is_case_insensitive_in_both_directions() {
        assert_eq!(match_topic("advanced mathematics"), Some("Mathematics"));
        assert_eq!(match_topic("PHYSICS"), Some("Physics"));
        // Subject contained in the topic name.
        assert_eq!(match_topic("learning"), Some("Machine Learning"));
        assert_eq!(match_topic("Art History"), None);
    }

    #[test]
    fn catalog_order_breaks_ties() {
        assert_eq!(match_topic("math"), Some("Mathematics"));
        assert_eq!(match_topic("data science with python"), Some("Python"));
    }

    #[test]
    fn recommendations_use_catalog_or_search() {
        let mut rng = StdRng::seed_from_u64(1);
        let recs = recommend_resources(&["Biology", "Organic Chemistry", "Art History"], &mut rng);

        assert_eq!(recs.len(), 3);
        assert!(
            [
                "https://www.khanacademy.org/science/biology",
                "https://www.biologycorner.com/"
            ]
            .contains(&recs[0].url.as_str())
        );
        assert!(recs[1].url.contains("chem"));
        assert_eq!(
            recs[2].url,
            "https://www.google.com/search?q=Art+History+learning+resources"
        );
    }
}
