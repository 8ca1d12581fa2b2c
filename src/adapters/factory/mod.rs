use crate::{
    domain::{self, Card, Owner},
    ports::card_factory::{CardFactoryPort, Error},
};

/// Factory building owners and cards straight from the domain constructors
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardFactory;

impl CardFactoryPort for StandardFactory {
    fn make_owner(&self, email: &str, name: &str) -> Result<Owner, Error> {
        Ok(Owner::new(email, name)?)
    }

    fn make_card(&self, owner: Owner) -> Result<Card, Error> {
        Ok(Card::new(owner))
    }
}

impl From<domain::Error> for Error {
    fn from(err: domain::Error) -> Self {
        match err {
            domain::Error::InvalidArgument(reason) => Self::InvalidArgument(reason),
            other => Self::Adapter(Box::new(other)),
        }
    }
}
