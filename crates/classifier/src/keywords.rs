//! Immutable keyword tables for the classification rule families.
//!
//! Tables mix English with romanized Hindi (Hinglish) and romanized Tamil
//! (Tanglish) so code-switched chats classify the same as plain English.
//! Extending coverage to a new language means adding entries here.

/// Greetings. Matched at the start of short messages only.
pub const GREETINGS: &[&str] = &[
    "hi", "hii", "hiii", "hey", "heyy", "heyyy", "hello", "helo", "yo", "sup",
    "oye", "oyee", "oi", "assalam", "salam", "namaste", "hola", "howdy",
    "wassup", "whats up", "whatsup", "good morning", "good afternoon",
    "good evening", "gm", "vanakkam", "vannakam", "da",
    "di", "dei", "machi", "machan", "machii", "nanba", "bhai", "bhaai",
    "kya hal", "kaise ho", "theek", "kem cho", "aur bata", "bolo", "bol na",
    "haan bhai", "are", "arey", "yov", "enna da", "eppadi", "sollu",
    "vaanga", "vaa", "pa", "maapla", "ji",
];

/// Words that open a question when they are the first word of the message.
pub const QUESTION_STARTERS: &[&str] = &[
    "what", "when", "where", "why", "how", "who", "which", "can", "could",
    "would", "will", "do", "does", "did", "is", "are", "have", "has", "kya",
    "kab", "kahan", "kaun", "kaise", "kidhar", "kitna", "kithe", "enna",
    "enga", "yaar", "yaaru", "eppo", "epdi", "ethuku", "evlo", "ethana",
    "yenda", "yen", "enge", "sollu", "panna", "mudiyuma", "theriyuma",
    "unaku", "neenga", "romba",
];

/// Action requests, matched anywhere in the message.
pub const REQUESTS: &[&str] = &[
    "please", "plz", "pls", "send", "share", "give", "tell", "help", "need",
    "want", "call", "come", "meet", "check", "look", "see", "reply",
    "respond", "answer", "batao", "bhejo", "bata", "karo", "dedo", "batado",
    "sunno", "suno", "bhejna", "dikhao", "samjhao", "sollu", "solu",
    "sollunga", "anuppu", "kudu", "kudungga", "paru", "paaru", "va",
    "vaanga", "pannunga", "pannuda", "konjam", "thaa", "kududa",
    "call pannu", "msg pannu", "reply pannu", "check pannu",
];

/// Follow-up phrases. Must match the whole (punctuation-stripped) message.
pub const FOLLOW_UPS: &[&str] = &[
    "hey", "you there", "hello", "still busy", "any update", "update", "so",
    "bro", "dude", "bhai", "are you there", "r u there", "reply", "seen",
    "online", "da", "dei", "machi", "machan", "bol na", "sun na", "kaha ho",
    "kidhar ho", "reply to kar", "msg dekh", "enna aachu", "enga da",
    "reply pannu da", "pesi mudicha", "vandhudu", "free ah",
];

/// Emotional or personal content, matched anywhere.
pub const EMOTIONAL: &[&str] = &[
    "miss you", "love", "sorry", "sad", "upset", "crying", "worried",
    "scared", "angry", "frustrated", "happy", "excited", "proud", "thank",
    "congrats", "congratulations", "rip", "passed away", "died", "hospital",
    "sick", "ill", "hurt", "pain", "broke", "breakup", "fight", "pyaar",
    "dukhi", "rona", "tension", "pareshan", "fikar", "gussa", "khush",
    "maafi", "dhanyavaad", "rodhane", "sogam", "kashtam", "valikuthu",
    "azhugiren", "bayam", "kovam", "sandhosham", "nandri", "kanneer",
    "vali", "kavalai", "manam", "nesam", "romba bad", "feel pannuren",
    "kedaikala", "mosam", "dhrogam",
];

/// Farewells, matched at the start of the message.
pub const FAREWELLS: &[&str] = &[
    "bye", "ok bye", "see you", "cya", "ttyl", "good night", "goodnight",
    "take care", "chal", "chalo", "tc", "later", "tata", "alvida",
    "phir milte", "baad mein", "chalta hu", "nikalta hu", "poi varen",
    "poitu varen", "sari da", "seri da", "seri po", "ta ta", "bye da",
    "bye di", "night da", "poidren", "varuven", "innum pesalam",
];

/// Short acknowledgements that do not warrant an automated reply.
/// Must match the whole (punctuation-stripped) message.
pub const ACKNOWLEDGEMENTS: &[&str] = &[
    "ok", "k", "kk", "okay", "👍", "👌", "🙏", "thanks", "thanku", "ty",
    "tq", "hmm", "mm", "hm", "oh", "ohk", "accha", "acha", "theek", "thik",
    "seri", "serida", "okda", "okdi", "hmda", "aamam", "haan", "ha", "ji",
    "ok va", "seri pa", "ok pa", "ok da", "ok machi", "nandri",
    "dhanyavaad", "thenkyu", "thanksu",
];

/// Happy sentiment markers.
pub const HAPPY: &[&str] = &[
    "happy", "excited", "great", "awesome", "amazing", "wonderful", "love",
    "haha", "lol", "😂", "😄", "🎉", "❤️", "😍", "yay", "woohoo",
    "fantastic", "perfect", "khush", "maza", "badhiya", "zabardast", "mast",
    "super", "superr", "semma", "theri", "mass", "vera level",
    "romba nalla", "adipoli", "kalakkal", "sema", "jolly", "chanceless",
];

/// Sad sentiment markers.
pub const SAD: &[&str] = &[
    "sad", "upset", "crying", "cry", "depressed", "lonely", "miss", "hurt",
    "pain", "😢", "😭", "💔", "sorry", "worried", "scared", "anxiety",
    "stressed", "dukhi", "rona", "udaas", "pareshan", "tension", "sogam",
    "kashtam", "valikuthu", "kanneer", "feel panren", "romba bad", "vali",
    "kavalai", "thanimai", "bayam",
];

/// Angry sentiment markers.
pub const ANGRY: &[&str] = &[
    "angry", "mad", "furious", "pissed", "annoyed", "frustrated", "wtf",
    "🤬", "😡", "hate", "gussa", "chidh", "irritate", "kovam", "erichhal",
    "podhum", "podhumda", "porukka mudiyala", "veriethuthu",
];

/// Urgent sentiment markers. These override every other sentiment family.
pub const URGENT: &[&str] = &[
    "urgent", "emergency", "asap", "immediately", "right now", "hurry",
    "quick", "fast", "sos", "911", "🚨", "⚠️", "critical", "jaldi",
    "turant", "fatafat", "abhi", "udane", "vegam", "seekiram", "urgent a",
    "konjam fast", "important da",
];

/// Keywords that escalate urgency to emergency on their own.
pub const EMERGENCY_WORDS: &[&str] = &[
    "emergency", "urgent", "asap", "help", "911", "sos", "critical", "🚨",
    "⚠️",
];

/// Keywords that mark a message as important (but not an emergency).
pub const IMPORTANT_WORDS: &[&str] = &[
    "important", "priority", "need", "please call", "call me",
];

/// Romanized Tamil words used for language-hit counting.
pub const TAMIL_ROMAN: &[&str] = &[
    "da", "di", "dei", "machi", "machan", "nanba", "enna", "enga", "eppo",
    "epdi", "sollu", "pannunga", "vaanga", "semma", "thala", "paaru",
    "kudu", "seri", "romba", "podu", "aana", "illa", "iruku", "theriyum",
    "konjam", "panna", "vandhu", "pogalam", "vaada", "vanakkam", "nandri",
];

/// Romanized Hindi words used for language-hit counting.
pub const HINDI_ROMAN: &[&str] = &[
    "kya", "kab", "kaise", "kahan", "kaun", "kitna", "bhai", "yaar",
    "acha", "theek", "haan", "nahi", "batao", "bhejo", "karo", "dekho",
    "sunno", "arey", "chalo", "abhi", "jaldi", "matlab", "wala", "mein",
    "hai", "toh", "bhi", "lekin", "bohot", "bahut", "tera", "mera",
    "apna", "humara",
];

/// Name fragments that mark a contact as family.
pub const FAMILY_NAMES: &[&str] = &[
    "mom", "mum", "mama", "amma", "dad", "papa", "baba", "sis", "bro",
    "brother", "sister", "bhai", "didi", "bhaiya", "appa", "aththai",
    "chitthi", "chitappa", "periappa", "periamma", "thatha", "paatti",
    "anna", "akka", "thambi", "thangai", "maama", "maami", "chachi",
    "chacha", "tai", "masi", "nani", "dada", "dadi", "athai", "maman",
];

/// Name fragments that mark a contact as professional.
pub const PROFESSIONAL_NAMES: &[&str] = &[
    "sir", "ma'am", "maam", "prof", "boss", "manager", "dr", "doctor",
    "teacher", "principal", "hod", "madam",
];

/// Formal markers in the tenant's own messages.
pub const FORMAL_MARKERS: &[&str] = &[
    "sir", "ma'am", "please", "kindly", "regards", "thank you", "noted",
    "will do", "madam", "respected", "acknowledge",
];

/// Casual markers in the tenant's own messages.
pub const CASUAL_MARKERS: &[&str] = &[
    "bro", "dude", "yaar", "bhai", "lol", "haha", "bruh", "omg", "wtf",
    "lmao", "oye", "da", "di", "dei", "machi", "machan", "nanba", "thala",
    "thambi", "anna", "pa", "vaa", "po", "semma", "mass", "vera level",
    "scene", "seri", "okda", "hmda", "machaa",
];

/// Affection markers in the tenant's own messages.
pub const AFFECTION_MARKERS: &[&str] = &[
    "love", "miss", "baby", "jaan", "darling", "sweetheart", "❤️", "😘",
    "🥰", "kannu", "chellam", "kutty", "bangaram", "ra", "raa", "pyaar",
    "kaadhal",
];
