mod common;

mod decision;
mod offers;
mod validation;
