#![cfg(test)]

mod fixtures;

mod contract;
mod resolution;
