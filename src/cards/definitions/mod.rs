//! Demonstration card definitions, one card per file.

mod a_feast_for_crows;
mod council_of_war;
mod eager_recruit;
mod grey_maester;
mod harbor_keep;
mod heavy_levy;
mod marching_orders;
mod ravenkeeper;
mod salt_raider;
mod shadow_infiltrator;
mod steadfast_squire;
mod sudden_ambush;
mod summer_harvest;
mod tide_of_war;
mod tourney_blade;
mod tourney_champion;
mod whispering_spymaster;

pub use a_feast_for_crows::a_feast_for_crows;
pub use council_of_war::{COUNCIL_DRAW, council_of_war};
pub use eager_recruit::eager_recruit;
pub use grey_maester::grey_maester;
pub use harbor_keep::harbor_keep;
pub use heavy_levy::heavy_levy;
pub use marching_orders::marching_orders;
pub use ravenkeeper::ravenkeeper;
pub use salt_raider::salt_raider;
pub use shadow_infiltrator::shadow_infiltrator;
pub use steadfast_squire::steadfast_squire;
pub use sudden_ambush::sudden_ambush;
pub use summer_harvest::summer_harvest;
pub use tide_of_war::tide_of_war;
pub use tourney_blade::tourney_blade;
pub use tourney_champion::tourney_champion;
pub use whispering_spymaster::whispering_spymaster;
