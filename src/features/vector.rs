//! Request body for `/predict`.
//!
//! The field set and order are a contract with the prediction service, so they
//! live in the struct definition rather than being assembled at runtime. Serde
//! emits fields in declaration order; one-hot flags and calendar fields are
//! integers, everything else is a float.
use serde::{Deserialize, Serialize};

use crate::court::types::CourtCoordinate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "Period")]
    pub period: f64,
    #[serde(rename = "Minutes_Remaining")]
    pub minutes_remaining: f64,
    #[serde(rename = "Seconds_Remaining")]
    pub seconds_remaining: f64,
    #[serde(rename = "Shot_Distance")]
    pub shot_distance: f64,
    #[serde(rename = "X_Location")]
    pub x_location: f64,
    #[serde(rename = "Y_Location")]
    pub y_location: f64,
    #[serde(rename = "Action_Type_Frequency")]
    pub action_type_frequency: f64,
    #[serde(rename = "Team_Name_Frequency")]
    pub team_name_frequency: f64,
    #[serde(rename = "Home_Team_Frequency")]
    pub home_team_frequency: f64,
    #[serde(rename = "Away_Team_Frequency")]
    pub away_team_frequency: f64,
    #[serde(rename = "ShotType_2PT_Field_Goal")]
    pub shot_type_2pt_field_goal: u8,
    #[serde(rename = "ShotType_3PT_Field_Goal")]
    pub shot_type_3pt_field_goal: u8,
    #[serde(rename = "ShotZoneBasic_Above_the_Break_3")]
    pub zone_basic_above_the_break_3: u8,
    #[serde(rename = "ShotZoneBasic_Backcourt")]
    pub zone_basic_backcourt: u8,
    #[serde(rename = "ShotZoneBasic_In_The_Paint_Non_RA")]
    pub zone_basic_in_the_paint_non_ra: u8,
    #[serde(rename = "ShotZoneBasic_Left_Corner_3")]
    pub zone_basic_left_corner_3: u8,
    #[serde(rename = "ShotZoneBasic_Mid_Range")]
    pub zone_basic_mid_range: u8,
    #[serde(rename = "ShotZoneBasic_Restricted_Area")]
    pub zone_basic_restricted_area: u8,
    #[serde(rename = "ShotZoneBasic_Right_Corner_3")]
    pub zone_basic_right_corner_3: u8,
    #[serde(rename = "ShotZoneArea_Back_Court_BC")]
    pub zone_area_back_court_bc: u8,
    #[serde(rename = "ShotZoneArea_Center_C")]
    pub zone_area_center_c: u8,
    #[serde(rename = "ShotZoneArea_Left_Side_Center_LC")]
    pub zone_area_left_side_center_lc: u8,
    #[serde(rename = "ShotZoneArea_Left_Side_L")]
    pub zone_area_left_side_l: u8,
    #[serde(rename = "ShotZoneArea_Right_Side_Center_RC")]
    pub zone_area_right_side_center_rc: u8,
    #[serde(rename = "ShotZoneArea_Right_Side_R")]
    pub zone_area_right_side_r: u8,
    #[serde(rename = "ShotZoneRange_16_24_ft")]
    pub zone_range_16_24_ft: u8,
    #[serde(rename = "ShotZoneRange_24_ft")]
    pub zone_range_24_ft: u8,
    #[serde(rename = "ShotZoneRange_8_16_ft")]
    pub zone_range_8_16_ft: u8,
    #[serde(rename = "ShotZoneRange_Back_Court_Shot")]
    pub zone_range_back_court_shot: u8,
    #[serde(rename = "ShotZoneRange_Less_Than_8_ft")]
    pub zone_range_less_than_8_ft: u8,
    #[serde(rename = "SeasonType_Playoffs")]
    pub season_type_playoffs: u8,
    #[serde(rename = "SeasonType_Regular_Season")]
    pub season_type_regular_season: u8,
    #[serde(rename = "Game_ID_Frequency")]
    pub game_id_frequency: f64,
    #[serde(rename = "Game_Event_ID_Frequency")]
    pub game_event_id_frequency: f64,
    #[serde(rename = "Player_ID_Frequency")]
    pub player_id_frequency: f64,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u8,
    #[serde(rename = "Day")]
    pub day: u8,
    #[serde(rename = "Day_of_Week")]
    pub day_of_week: u8,
}

/// Wire names in serialization order.
pub const FIELD_NAMES: [&str; 39] = [
    "Period",
    "Minutes_Remaining",
    "Seconds_Remaining",
    "Shot_Distance",
    "X_Location",
    "Y_Location",
    "Action_Type_Frequency",
    "Team_Name_Frequency",
    "Home_Team_Frequency",
    "Away_Team_Frequency",
    "ShotType_2PT_Field_Goal",
    "ShotType_3PT_Field_Goal",
    "ShotZoneBasic_Above_the_Break_3",
    "ShotZoneBasic_Backcourt",
    "ShotZoneBasic_In_The_Paint_Non_RA",
    "ShotZoneBasic_Left_Corner_3",
    "ShotZoneBasic_Mid_Range",
    "ShotZoneBasic_Restricted_Area",
    "ShotZoneBasic_Right_Corner_3",
    "ShotZoneArea_Back_Court_BC",
    "ShotZoneArea_Center_C",
    "ShotZoneArea_Left_Side_Center_LC",
    "ShotZoneArea_Left_Side_L",
    "ShotZoneArea_Right_Side_Center_RC",
    "ShotZoneArea_Right_Side_R",
    "ShotZoneRange_16_24_ft",
    "ShotZoneRange_24_ft",
    "ShotZoneRange_8_16_ft",
    "ShotZoneRange_Back_Court_Shot",
    "ShotZoneRange_Less_Than_8_ft",
    "SeasonType_Playoffs",
    "SeasonType_Regular_Season",
    "Game_ID_Frequency",
    "Game_Event_ID_Frequency",
    "Player_ID_Frequency",
    "Year",
    "Month",
    "Day",
    "Day_of_Week",
];

/// Contextual template: a scaled late-game two-pointer in the 2022 playoffs.
/// Only the two location fields are replaced per click.
pub const SHOT_CONTEXT: FeatureVector = FeatureVector {
    period: -0.4,
    minutes_remaining: 1.4,
    seconds_remaining: -1.3,
    shot_distance: 0.3,
    x_location: 0.0,
    y_location: 0.0,
    action_type_frequency: 0.5,
    team_name_frequency: 0.5,
    home_team_frequency: 0.4,
    away_team_frequency: 0.6,
    shot_type_2pt_field_goal: 1,
    shot_type_3pt_field_goal: 0,
    zone_basic_above_the_break_3: 0,
    zone_basic_backcourt: 0,
    zone_basic_in_the_paint_non_ra: 0,
    zone_basic_left_corner_3: 0,
    zone_basic_mid_range: 0,
    zone_basic_restricted_area: 1,
    zone_basic_right_corner_3: 0,
    zone_area_back_court_bc: 1,
    zone_area_center_c: 0,
    zone_area_left_side_center_lc: 0,
    zone_area_left_side_l: 0,
    zone_area_right_side_center_rc: 1,
    zone_area_right_side_r: 0,
    zone_range_16_24_ft: 0,
    zone_range_24_ft: 1,
    zone_range_8_16_ft: 0,
    zone_range_back_court_shot: 1,
    zone_range_less_than_8_ft: 0,
    season_type_playoffs: 1,
    season_type_regular_season: 0,
    game_id_frequency: 0.8,
    game_event_id_frequency: 0.7,
    player_id_frequency: 0.9,
    year: 2022,
    month: 6,
    day: 11,
    day_of_week: 5,
};

impl FeatureVector {
    /// Whether every float field is finite. serde_json writes NaN and ±inf as
    /// `null`, which the service cannot read.
    pub fn is_finite(&self) -> bool {
        [
            self.period,
            self.minutes_remaining,
            self.seconds_remaining,
            self.shot_distance,
            self.x_location,
            self.y_location,
            self.action_type_frequency,
            self.team_name_frequency,
            self.home_team_frequency,
            self.away_team_frequency,
            self.game_id_frequency,
            self.game_event_id_frequency,
            self.player_id_frequency,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Court units per feature unit for the location fields.
const LOCATION_SCALE: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
pub struct FeatureVectorBuilder {
    template: FeatureVector,
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new(SHOT_CONTEXT)
    }
}

impl FeatureVectorBuilder {
    pub fn new(template: FeatureVector) -> Self {
        Self { template }
    }

    pub fn build(&self, coord: CourtCoordinate) -> FeatureVector {
        FeatureVector {
            x_location: coord.x / LOCATION_SCALE,
            y_location: coord.y / LOCATION_SCALE,
            ..self.template
        }
    }
}
