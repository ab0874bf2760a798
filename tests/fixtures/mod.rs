//! Test fixtures for integration testing

use league_ranker::error::Result;
use league_ranker::types::{ScoreEntry, Team, TeamInfo};
use league_ranker::TeamDirectory;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Team directory that counts lookups
#[derive(Debug, Default)]
pub struct CountingTeamDirectory {
    teams: Vec<TeamInfo>,
    lookups: AtomicUsize,
}

impl CountingTeamDirectory {
    pub fn new(teams: Vec<TeamInfo>) -> Self {
        Self {
            teams,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl TeamDirectory for CountingTeamDirectory {
    fn teams(&self) -> Result<Vec<TeamInfo>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.teams.clone())
    }
}

pub fn team_info(id: &str, name: &str, mascot: &str) -> TeamInfo {
    TeamInfo {
        id: id.to_string(),
        name: name.to_string(),
        mascot: mascot.to_string(),
    }
}

/// Add one game to both teams' histories
pub fn play(
    teams: &mut [Team],
    week: u32,
    home: &str,
    home_score: u32,
    away: &str,
    away_score: u32,
) {
    for team in teams.iter_mut() {
        let entry = if team.id == home {
            ScoreEntry::new(home_score, away_score, away)
        } else if team.id == away {
            ScoreEntry::new(away_score, home_score, home)
        } else {
            continue;
        };
        team.add_game(week, entry);
    }
}

/// Small conference: one unbeaten team, one winless team, and byes for teams 2 and 5
pub fn conference() -> Vec<Team> {
    let mut teams: Vec<Team> = ["1", "2", "3", "4", "5"]
        .iter()
        .map(|id| Team::new(*id))
        .collect();

    play(&mut teams, 1, "1", 35, "2", 10);
    play(&mut teams, 1, "3", 17, "4", 14);
    play(&mut teams, 2, "1", 28, "3", 21);
    play(&mut teams, 2, "4", 24, "5", 3);
    play(&mut teams, 3, "1", 42, "4", 7);
    play(&mut teams, 3, "2", 20, "5", 13);
    play(&mut teams, 3, "3", 31, "5", 0);

    teams
}

pub fn conference_directory() -> CountingTeamDirectory {
    CountingTeamDirectory::new(vec![
        team_info("1", "Springfield", "Isotopes"),
        team_info("2", "Shelbyville", "Sharks"),
        team_info("3", "Capital City", "Capitals"),
        team_info("4", "Ogdenville", "Otters"),
        team_info("5", "North Haverbrook", "Monorails"),
    ])
}

/// Round-robin league with deterministic pseudo-random scores
pub fn round_robin(team_count: usize, weeks: u32) -> Vec<Team> {
    let mut teams: Vec<Team> = (0..team_count).map(|i| Team::new(i.to_string())).collect();
    let mut seed: u64 = 0x5eed;

    for week in 1..=weeks {
        let offset = week as usize % team_count.max(1);
        for i in (0..team_count).step_by(2) {
            let j = (i + 1 + offset * 2) % team_count;
            if i == j || teams[i].plays_in(week) || teams[j].plays_in(week) {
                continue;
            }
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let home_score = ((seed >> 33) % 50) as u32;
            let away_score = ((seed >> 17) % 50) as u32;
            let (home, away) = (i.to_string(), j.to_string());
            play(&mut teams, week, &home, home_score, &away, away_score);
        }
    }

    teams
}
