// Canned assistant replies. Data-driven replies are formatted in classifier.rs.

pub const GREETING: &str = "Hello! I'm your engineering admissions assistant. \
    Tell me your cutoff mark and community category (OC, BC, BCM, MBC, SC, SCA or ST) \
    and I'll suggest colleges and branches you can aim for.";

pub const SMALL_TALK: &str = "I'm doing great, thanks for asking! \
    I'm ready to help you find engineering colleges that match your cutoff. \
    What did you score, and which category are you in?";

pub const SCORE_PROMPT: &str = "I can help you find engineering colleges! \
    Please share your cutoff mark and your category. \
    For example: \"I scored 185 marks in BC category\".";

pub const HELP: &str = "I can suggest engineering colleges based on your cutoff mark and category. \
    Try messages like:\n\
    - \"I scored 185 marks in BC category\"\n\
    - \"My cutoff is 172.5 and I'm MBC\"\n\
    - \"marks: 160, category: SC\"";

pub const NO_MATCH_ALTERNATIVES: &str = "You could consider self-financing colleges, \
    diploma-to-degree lateral entry, or branches with lower historical cutoffs. \
    Cutoffs also shift every year, so keep an eye on the counselling rounds.";
