//! Default content for a fresh data directory.
//!
//! Two worldbooks and one character living in each. A collection is seeded
//! only while it is empty, so running this again never duplicates anything.

use tracing::info;
use worldtale_application::ports::repository::{
    CharacterRepository, EntityRepository, RepositoryError, WorldbookRepository,
};
use worldtale_domain::{NewCharacter, NewMemory, NewWorldbook, Personality};

/// What a seeding run added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub worldbooks: usize,
    pub characters: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.worldbooks == 0 && self.characters == 0
    }
}

const LOST_LINER: &str = "Lost Liner";
const CYBERPUNK_CITY: &str = "Cyberpunk City";

fn default_worldbooks() -> Vec<NewWorldbook> {
    vec![
        NewWorldbook {
            image: Some("/images/cruise-ship.jpg".to_string()),
            ..NewWorldbook::new(
                LOST_LINER,
                "A mysterious cruise liner sailing through the cracks between times. \
Its passengers come from different eras and different worlds.",
            )
            .with_rules(
                "1. The liner has seven decks, each with its own facilities and encounters.\n\
2. Time flows unevenly aboard, sometimes fast and sometimes slow.\n\
3. Passengers lose part of their memories when boarding and recover them as the voyage goes on.\n\
4. The liner docks at different anchors in time, where passengers may briefly go ashore.",
            )
            .with_tag("fantasy")
            .with_tag("mystery")
            .with_tag("adventure")
            .with_genre("fantasy")
        },
        NewWorldbook {
            image: Some("/images/cyberpunk-city.jpg".to_string()),
            ..NewWorldbook::new(
                CYBERPUNK_CITY,
                "A future metropolis of high tech and low life. Megacorporations control \
everything while hackers and augmented outcasts work in the shadows.",
            )
            .with_rules(
                "1. The city is split into the upper district (corporations and the rich) and the lower district (slums).\n\
2. Most people carry cybernetic augmentations of some degree.\n\
3. Network intrusion and hacking are everywhere.\n\
4. Megacorporations control the city's politics and economy.\n\
5. Cyber-rejection is a common illness; too many implants lead to mental collapse.",
            )
            .with_tag("sci-fi")
            .with_tag("dystopia")
            .with_tag("cyberpunk")
            .with_genre("sci-fi")
        },
    ]
}

/// Characters paired with the title of the world they belong to.
fn default_characters() -> Result<Vec<(&'static str, NewCharacter)>, RepositoryError> {
    Ok(vec![
        (
            LOST_LINER,
            NewCharacter {
                image: Some("/images/captain.jpg".to_string()),
                ..NewCharacter::new("Aria", "captain")
                    .with_personality(Personality::new(80, 70, 60, 50, 30)?)
                    .with_description(
                        "The enigmatic captain of the Lost Liner. She knows many of the ship's \
secrets but rarely reveals them outright.",
                    )
                    .with_memory(NewMemory::core(
                        "I am the captain of the Lost Liner, charged with guiding it through time.",
                    ))
                    .with_memory(NewMemory::core(
                        "I know the liner's true purpose, but I am forbidden to tell the passengers.",
                    ))
            },
        ),
        (
            CYBERPUNK_CITY,
            NewCharacter {
                image: Some("/images/bounty-hunter.jpg".to_string()),
                ..NewCharacter::new("Rex", "bounty hunter")
                    .with_personality(Personality::new(40, 60, 30, 20, 50)?)
                    .with_description(
                        "A seasoned bounty hunter with several cybernetic augmentations and a \
deep distrust of the corporations.",
                    )
                    .with_memory(NewMemory::core(
                        "I used to work for the military, until I found out about their secret experiments.",
                    ))
                    .with_memory(NewMemory::core(
                        "My left arm and right eye are cybernetic, installed by a back-alley doctor.",
                    ))
            },
        ),
    ])
}

/// Install the default worldbooks and characters into empty collections.
pub fn seed_defaults(repository: &dyn EntityRepository) -> Result<SeedReport, RepositoryError> {
    let mut report = SeedReport::default();

    if repository.list_worldbooks().is_empty() {
        for worldbook in default_worldbooks() {
            repository.create_worldbook(worldbook)?;
            report.worldbooks += 1;
        }
    }

    if repository.list_characters().is_empty() {
        let worldbooks = repository.list_worldbooks();
        for (world_title, mut character) in default_characters()? {
            if let Some(world) = worldbooks.iter().find(|w| w.title == world_title) {
                character.world_id = Some(world.id);
                character.world_name = Some(world.title.clone());
            }
            repository.create_character(character)?;
            report.characters += 1;
        }
    }

    if !report.is_empty() {
        info!(
            worldbooks = report.worldbooks,
            characters = report.characters,
            "Installed default content"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryStore, JsonRepository};
    use std::sync::Arc;
    use worldtale_domain::Trait;

    fn repository() -> JsonRepository {
        JsonRepository::new(Arc::new(InMemoryStore::new()))
    }

    #[test]
    fn test_seed_fresh_repository() {
        let repo = repository();
        let report = seed_defaults(&repo).unwrap();
        assert_eq!(
            report,
            SeedReport {
                worldbooks: 2,
                characters: 2
            }
        );

        let worlds = repo.list_worldbooks();
        assert_eq!(worlds[0].title, "Lost Liner");
        assert_eq!(worlds[1].tags, vec!["sci-fi", "dystopia", "cyberpunk"]);

        let aria = repo.get_character(1).unwrap();
        assert_eq!(aria.world_id, Some(worlds[0].id));
        assert_eq!(aria.world_name.as_deref(), Some("Lost Liner"));
        assert_eq!(aria.core_memories().count(), 2);
        assert_eq!(aria.personality.unwrap().score(Trait::Openness), 80);

        let rex = repo.get_character(2).unwrap();
        assert_eq!(rex.world_id, Some(worlds[1].id));
        assert_eq!(rex.personality.unwrap().score(Trait::Agreeableness), 20);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let repo = repository();
        seed_defaults(&repo).unwrap();
        let report = seed_defaults(&repo).unwrap();
        assert!(report.is_empty());
        assert_eq!(repo.list_worldbooks().len(), 2);
        assert_eq!(repo.list_characters().len(), 2);
    }

    #[test]
    fn test_seed_leaves_existing_worldbooks_alone() {
        let repo = repository();
        repo.create_worldbook(NewWorldbook::new("Homebrew", "Mine."))
            .unwrap();

        let report = seed_defaults(&repo).unwrap();

        assert_eq!(report.worldbooks, 0);
        assert_eq!(report.characters, 2);
        assert_eq!(repo.list_worldbooks().len(), 1);
        // Their worlds were not seeded, so the characters stay unattached.
        assert!(repo.list_characters().iter().all(|c| c.world_id.is_none()));
    }
}
