// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Addr, Context, Handler};
use sealbid_events::{AuctionEvent, Event, EventBus, Subscribe};
use std::marker::PhantomData;
use tracing::info;

pub trait EventLogging: Event {
    fn log(&self, logger_name: &str);
}

/// Bus listener that writes every event to the tracing output under a node name.
pub struct SimpleLogger<E: EventLogging> {
    name: String,
    _p: PhantomData<E>,
}

impl<E: EventLogging> SimpleLogger<E> {
    pub fn attach(name: &str, bus: Addr<EventBus<E>>) -> Addr<Self> {
        let addr = Self {
            name: name.to_owned(),
            _p: PhantomData,
        }
        .start();
        bus.do_send(Subscribe::<E>::new("*", addr.clone().recipient()));
        info!(node=%name, "READY!");
        addr
    }
}

impl<E: EventLogging> Actor for SimpleLogger<E> {
    type Context = Context<Self>;
}

impl<E: EventLogging> Handler<E> for SimpleLogger<E> {
    type Result = ();

    fn handle(&mut self, msg: E, _: &mut Self::Context) -> Self::Result {
        msg.log(&self.name);
    }
}

impl EventLogging for AuctionEvent {
    fn log(&self, logger_name: &str) {
        let auction = self.auction();
        match self {
            AuctionEvent::AuctionFinalized { data, .. } => info!(
                me = logger_name,
                auction = %auction,
                bids = data.bid_count,
                "Auction finalized"
            ),
            _ => info!(me = logger_name, evt = %self, auction = %auction, "Event Broadcasted"),
        }
    }
}
