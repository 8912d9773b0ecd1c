//! Locations of the document application's controls

use crate::driver::traits::Selector;

pub fn app_root() -> Selector {
    Selector::id("root")
}

pub fn documents_nav() -> Selector {
    Selector::css("a.nav-link[href='/documents']")
}

pub fn document_card() -> Selector {
    Selector::class("document-card")
}

/// The `n`th card of the document list, zero based
pub fn nth_card(n: usize) -> Selector {
    Selector::Class("document-card".to_string(), n)
}

/// The most recently added card
pub fn newest_card() -> Selector {
    document_card().last()
}

pub fn add_card_button() -> Selector {
    Selector::css("div.col-auto > button.btn-primary[type='button']")
}

pub fn modal() -> Selector {
    Selector::class("modal-content")
}

pub fn card_title(card: Selector) -> Selector {
    Selector::class("document-card-title").within(card)
}

pub fn card_lines(card: Selector) -> Selector {
    Selector::css("p").within(card)
}

pub mod form {
    use crate::driver::traits::Selector;

    pub fn title() -> Selector {
        Selector::id("formDocumentTitle")
    }

    pub fn add_stakeholder() -> Selector {
        Selector::button("Add Stakeholder")
    }

    /// Input created by the last "Add Stakeholder" click
    pub fn newest_stakeholder() -> Selector {
        Selector::id("formDocumentStakeholders").last()
    }

    pub fn remove_stakeholder() -> Selector {
        Selector::css("button.btn-danger").within(super::modal())
    }

    pub fn scale() -> Selector {
        Selector::id("formDocumentScale")
    }

    pub fn issuance_date() -> Selector {
        Selector::id("formDocumentIssuanceDate")
    }

    pub fn doc_type() -> Selector {
        Selector::id("formDocumentType")
    }

    pub fn language() -> Selector {
        Selector::id("formDocumentLanguage")
    }

    pub fn pages() -> Selector {
        Selector::id("formDocumentNrPages")
    }

    // Latitude and longitude share an id, the label in front tells them apart
    pub fn latitude() -> Selector {
        Selector::xpath(
            "//small[text()='Latitude']/following-sibling::input[@id='formDocumentGeolocation']",
        )
    }

    pub fn longitude() -> Selector {
        Selector::xpath(
            "//small[text()='Longitude']/following-sibling::input[@id='formDocumentGeolocation']",
        )
    }

    pub fn description() -> Selector {
        Selector::id("formDocumentDescription")
    }

    pub fn files() -> Selector {
        Selector::css("input[type='file']")
    }

    pub fn save() -> Selector {
        Selector::xpath("//button[@class='btn btn-primary' and contains(text(), 'Save')]")
    }

    pub fn close() -> Selector {
        Selector::button("Close")
    }

    pub fn modify() -> Selector {
        Selector::button("Modify").within(super::modal())
    }
}

pub mod link {
    use crate::driver::traits::Selector;

    pub fn link_to() -> Selector {
        Selector::button("Link to").within(super::modal())
    }

    pub fn selection_modal() -> Selector {
        Selector::class("card-selection-modal")
    }

    pub fn candidates() -> Selector {
        Selector::class("document-card").within(selection_modal())
    }

    pub fn first_candidate() -> Selector {
        Selector::Class("document-card".to_string(), 0).within(selection_modal())
    }

    pub fn link_type() -> Selector {
        Selector::id("formLinkType")
    }

    pub fn confirm() -> Selector {
        Selector::button("Confirm")
    }

    /// Final "Link (n)" button of the card modal
    pub fn submit() -> Selector {
        Selector::xpath("//div[@class='col-auto']//button[contains(text(), 'Link')]")
    }
}
