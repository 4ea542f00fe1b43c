mod fixtures;
mod season;
