mod common;
mod connect;
mod isolation;
mod round_trip;
mod select;
mod unencrypted;
