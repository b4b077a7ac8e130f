//! Demonstration records loaded at startup when seeding is enabled.

use uuid::{uuid, Uuid};

use crate::Repository;

const DEMO: [(Uuid, &str, &str, &[&str]); 5] = [
    (
        uuid!("ff521081-0c83-42ce-8bdc-2521549bbeca"),
        "https://github.com/Rocketseat/umbriel",
        "Umbriel",
        &["Node", "Express", "TypeScript"],
    ),
    (
        uuid!("77ea2377-18f3-4234-a5c6-99ec013042cd"),
        "https://github.com/matheusgrigoletto/swift",
        "Swift",
        &["Swift"],
    ),
    (
        uuid!("ce64e912-3910-4fa7-a100-aa398b85fb80"),
        "https://github.com/matheusgrigoletto/flutter",
        "Flutter",
        &["Flutter", "Dart"],
    ),
    (
        uuid!("23e35f84-3324-4319-94e7-ec25cccc2381"),
        "https://github.com/matheusgrigoletto/react",
        "React",
        &["React", "Javascript", "TypeScript"],
    ),
    (
        uuid!("5a743eab-5ece-4c7a-b517-3581f45df9db"),
        "https://github.com/matheusgrigoletto/angular",
        "Angular",
        &["Angular", "TypeScript"],
    ),
];

/// The demo collection, in display order, all with zero likes.
pub fn demo_repositories() -> Vec<Repository> {
    DEMO.iter()
        .map(|(id, url, title, techs)| Repository {
            id: (*id).into(),
            url: url.to_string(),
            title: title.to_string(),
            techs: techs.iter().map(|t| t.to_string()).collect(),
            likes: 0,
        })
        .collect()
}
