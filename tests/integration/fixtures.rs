//! Builders for a small club season used by the integration tests.
//!
//! Thursday Tour, two teams of two, three competitions:
//! - round 1 (7 May, series 1, points ×2): everyone finished, one manual total
//! - round 2 (14 May, series 1): two finished, one in progress, one not started
//! - round 3 (next January): nobody has teed off

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tourscore::scoring::handicap::default_stroke_index;
use tourscore::storage::{Enrollment, EnrollmentStatus, Snapshot};
use tourscore::types::{
    Competition, Gender, HoleScores, Participant, Rating, ScoringMode, Tee, Tour,
};

pub const TOUR_ID: i64 = 1;
pub const ROUND_ONE: i64 = 101;
pub const ROUND_TWO: i64 = 102;
pub const ROUND_THREE: i64 = 103;

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;
pub const CARL: i64 = 3;
pub const DANA: i64 = 4;

pub const PARS: [i32; 18] = [4, 4, 3, 5, 4, 3, 4, 5, 4, 4, 4, 3, 5, 4, 3, 4, 5, 4];

pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

/// Round `over` strokes over par, one extra stroke per hole from the first.
pub fn round_over(over: usize) -> HoleScores {
    let mut scores = PARS;
    for i in 0..over {
        scores[i % 18] += 1;
    }
    HoleScores::new(scores).unwrap()
}

/// First `holes` holes at par with a bogey on the first, rest unplayed.
pub fn partial_round(holes: usize) -> HoleScores {
    let mut scores = [0; 18];
    scores[..holes].copy_from_slice(&PARS[..holes]);
    scores[0] += 1;
    HoleScores::new(scores).unwrap()
}

pub fn white_tee() -> Tee {
    Tee {
        id: 1,
        name: "White".into(),
        course_rating: dec!(72.0),
        slope_rating: 113,
        stroke_index: Some(default_stroke_index()),
        women: Some(Rating {
            course_rating: dec!(74.0),
            slope_rating: 125,
        }),
    }
}

fn player(
    player_id: i64,
    name: &str,
    team: (i64, &str),
    index: Decimal,
    gender: Gender,
    score: Option<HoleScores>,
    locked: bool,
) -> Participant {
    Participant {
        id: player_id * 1000 + team.0,
        team_id: team.0,
        team_name: team.1.to_string(),
        player_id: Some(player_id),
        player_name: Some(name.to_string()),
        score,
        manual_score_total: None,
        is_locked: locked,
        start_time: NaiveTime::from_hms_opt(8, 10 * team.0 as u32, 0),
        category_id: None,
        category_name: None,
        handicap_index: Some(index),
        playing_handicap: None,
        gender: Some(gender),
    }
}

fn competition(id: i64, date: NaiveDate, participants: Vec<Participant>) -> Competition {
    Competition {
        id,
        name: format!("Thursday Medal {}", id - 100),
        date,
        tour_id: Some(TOUR_ID),
        series_id: Some(1),
        points_multiplier: dec!(1),
        pars: Some(PARS.to_vec()),
        tee: Some(white_tee()),
        scoring_mode: None,
        category_tees: Vec::new(),
        categories: Vec::new(),
        participants,
    }
}

const EAGLES: (i64, &str) = (1, "Eagles");
const BIRDIES: (i64, &str) = (2, "Birdies");

pub fn season() -> Snapshot {
    let mut dana_manual = player(DANA, "Dana", BIRDIES, dec!(8), Gender::Male, None, true);
    dana_manual.manual_score_total = Some(80);

    let mut round_one = competition(
        ROUND_ONE,
        NaiveDate::from_ymd_opt(2026, 5, 7).unwrap(),
        vec![
            player(ALICE, "Alice", EAGLES, dec!(10), Gender::Female, Some(round_over(12)), true),
            player(BOB, "Bob", EAGLES, dec!(2), Gender::Male, Some(round_over(3)), true),
            player(CARL, "Carl", BIRDIES, dec!(20), Gender::Male, Some(round_over(18)), true),
            dana_manual,
        ],
    );
    round_one.points_multiplier = dec!(2);

    let round_two = competition(
        ROUND_TWO,
        NaiveDate::from_ymd_opt(2026, 5, 14).unwrap(),
        vec![
            player(ALICE, "Alice", EAGLES, dec!(10), Gender::Female, Some(round_over(5)), true),
            player(BOB, "Bob", EAGLES, dec!(2), Gender::Male, Some(round_over(3)), true),
            player(CARL, "Carl", BIRDIES, dec!(20), Gender::Male, None, false),
            player(DANA, "Dana", BIRDIES, dec!(8), Gender::Male, Some(partial_round(9)), false),
        ],
    );

    let round_three = competition(
        ROUND_THREE,
        NaiveDate::from_ymd_opt(2027, 1, 14).unwrap(),
        vec![player(ALICE, "Alice", EAGLES, dec!(10), Gender::Female, None, false)],
    );

    let enrollments = [ALICE, BOB, CARL, DANA]
        .into_iter()
        .map(|id| Enrollment {
            tour_id: TOUR_ID,
            player_id: Some(id),
            email: None,
            status: EnrollmentStatus::Active,
        })
        .chain(std::iter::once(Enrollment {
            tour_id: TOUR_ID,
            player_id: None,
            email: Some("waiting@example.com".into()),
            status: EnrollmentStatus::Requested,
        }))
        .collect();

    Snapshot {
        tours: vec![Tour {
            id: TOUR_ID,
            name: "Thursday Tour".into(),
            scoring_mode: Some(ScoringMode::Both),
            point_template: None,
            categories: Vec::new(),
        }],
        competitions: vec![round_three, round_two, round_one],
        enrollments,
    }
}
