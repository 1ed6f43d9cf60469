//! HHS-HCC V07 commercial model.
//!
//! Members are split into adult, child and infant segments. Adults and
//! children go through hierarchies, groups and interactions; infants are
//! scored on a demographic cell plus one maturity-by-severity category.

use risk_types::{AgeSegment, FactorKind, ModelKey, ModelVersion, Sex};

use super::ModelRules;
use crate::aggregate::Adjustment;
use crate::beneficiary::Beneficiary;
use crate::category_set::CategorySet;
use crate::demographics::{AgeBand, BandNaming, DemographicClassifier};
use crate::error::InputError;
use crate::interactions::{
    Condition, CountBucket, CountExclusions, CountRule, DerivedCategory, InteractionEngine,
    InteractionRule, Membership,
};
use crate::mapper::{AgeSexEdit, EditCondition, EditOutcome};

const EDIT_1_CODES: &[&str] = &[
    "C9100", "C9101", "C9102", "C9500", "C9501", "C9502", "C7400", "C7401", "C7402", "C7410",
    "C7411", "C7412", "C7490", "C7491", "C7492",
];

const EDIT_2_CODES: &[&str] = &[
    "J410", "J411", "J418", "J42", "J440", "J441", "J4481", "J4489",
];

const EDIT_3_CODES: &[&str] = &[
    "K55011", "K55012", "K55019", "K55021", "K55022", "K55029", "K55031", "K55032", "K55039",
    "K55041", "K55042", "K55049", "K55051", "K55052", "K55059", "K55061", "K55062", "K55069",
    "K5530", "K5531", "K5532", "K5533",
];

const EDIT_4_CODES: &[&str] = &[
    "C50011", "C50012", "C50019", "C50021", "C50022", "C50029", "C50111", "C50112", "C50119",
    "C50121", "C50122", "C50129", "C50211", "C50212", "C50219", "C50221", "C50222", "C50229",
    "C50311", "C50312", "C50319", "C50321", "C50322", "C50329", "C50411", "C50412", "C50419",
    "C50421", "C50422", "C50429", "C50511", "C50512", "C50519", "C50521", "C50522", "C50529",
    "C50611", "C50612", "C50619", "C50621", "C50622", "C50629", "C50811", "C50812", "C50819",
    "C50821", "C50822", "C50829", "C50911", "C50912", "C50919", "C50921", "C50922", "C50929",
];

const EDIT_5_CODES: &[&str] = &[
    "J430", "J431", "J432", "J438", "J439", "J449", "J982", "J983", "F200", "F201", "F202", "F203",
    "F205", "F2081", "F2089", "F209", "F21", "F22", "F23", "F24", "F250", "F251", "F258", "F259",
    "F28", "F29", "F3010", "F3011", "F3012", "F3013", "F302", "F303", "F304", "F308", "F309",
    "F310", "F3110", "F3111", "F3112", "F3113", "F312", "F3130", "F3131", "F3132", "F314", "F315",
    "F3160", "F3161", "F3162", "F3163", "F3164", "F3170", "F3171", "F3172", "F3173", "F3174",
    "F3175", "F3176", "F3177", "F3178", "F3181", "F3189", "F319", "F322", "F323", "F332", "F333",
    "F440", "F441", "F4481", "F481", "F5000", "F5001", "F5002", "F502", "F600", "F601", "F602",
    "F603", "F604", "F605", "F606", "F607", "F6081", "F6089", "F609", "G47411", "G47419", "G47421",
    "G47429", "R4588", "T1491XA", "T360X2A", "T361X2A", "T362X2A", "T363X2A", "T364X2A", "T365X2A",
    "T366X2A", "T367X2A", "T368X2A", "T3692XA", "T370X2A", "T371X2A", "T372X2A", "T373X2A",
    "T374X2A", "T375X2A", "T378X2A", "T3792XA", "T380X2A", "T381X2A", "T382X2A", "T383X2A",
    "T384X2A", "T385X2A", "T386X2A", "T387X2A", "T38802A", "T38812A", "T38892A", "T38902A",
    "T38992A", "T39012A", "T39092A", "T391X2A", "T392X2A", "T39312A", "T39392A", "T394X2A",
    "T398X2A", "T3992XA", "T400X2A", "T401X2A", "T402X2A", "T403X2A", "T40412A", "T40422A",
    "T40492A", "T405X2A", "T40602A", "T40692A", "T40712A", "T40722A", "T408X2A", "T40902A",
    "T40992A", "T410X2A", "T411X2A", "T41202A", "T41292A", "T413X2A", "T4142XA", "T415X2A",
    "T420X2A", "T421X2A", "T422X2A", "T423X2A", "T424X2A", "T425X2A", "T426X2A", "T4272XA",
    "T428X2A", "T43012A", "T43022A", "T431X2A", "T43202A", "T43212A", "T43222A", "T43292A",
    "T433X2A", "T434X2A", "T43502A", "T43592A", "T43602A", "T43612A", "T43622A", "T43632A",
    "T43642A", "T43652A", "T43692A", "T438X2A", "T4392XA", "T440X2A", "T441X2A", "T442X2A",
    "T443X2A", "T444X2A", "T445X2A", "T446X2A", "T447X2A", "T448X2A", "T44902A", "T44992A",
    "T450X2A", "T451X2A", "T452X2A", "T453X2A", "T454X2A", "T45512A", "T45522A", "T45602A",
    "T45612A", "T45622A", "T45692A", "T457X2A", "T458X2A", "T4592XA", "T460X2A", "T461X2A",
    "T462X2A", "T463X2A", "T464X2A", "T465X2A", "T466X2A", "T467X2A", "T468X2A", "T46902A",
    "T46992A", "T470X2A", "T471X2A", "T472X2A", "T473X2A", "T474X2A", "T475X2A", "T476X2A",
    "T477X2A", "T478X2A", "T4792XA", "T480X2A", "T481X2A", "T48202A", "T48292A", "T483X2A",
    "T484X2A", "T485X2A", "T486X2A", "T48902A", "T48992A", "T490X2A", "T491X2A", "T492X2A",
    "T493X2A", "T494X2A", "T495X2A", "T496X2A", "T497X2A", "T498X2A", "T4992XA", "T500X2A",
    "T501X2A", "T502X2A", "T503X2A", "T504X2A", "T505X2A", "T506X2A", "T507X2A", "T508X2A",
    "T50902A", "T50912A", "T50992A", "T50A12A", "T50A22A", "T50A92A", "T50B12A", "T50B92A",
    "T50Z12A", "T50Z92A", "T510X2A", "T511X2A", "T512X2A", "T513X2A", "T518X2A", "T5192XA",
    "T520X2A", "T521X2A", "T522X2A", "T523X2A", "T524X2A", "T528X2A", "T5292XA", "T530X2A",
    "T531X2A", "T532X2A", "T533X2A", "T534X2A", "T535X2A", "T536X2A", "T537X2A", "T5392XA",
    "T540X2A", "T541X2A", "T542X2A", "T543X2A", "T5492XA", "T550X2A", "T551X2A", "T560X2A",
    "T561X2A", "T562X2A", "T563X2A", "T564X2A", "T565X2A", "T566X2A", "T567X2A", "T56812A",
    "T56822A", "T56892A", "T5692XA", "T570X2A", "T571X2A", "T572X2A", "T573X2A", "T578X2A",
    "T5792XA", "T5802XA", "T5812XA", "T582X2A", "T588X2A", "T5892XA", "T590X2A", "T591X2A",
    "T592X2A", "T593X2A", "T594X2A", "T595X2A", "T596X2A", "T597X2A", "T59812A", "T59892A",
    "T5992XA", "T600X2A", "T601X2A", "T602X2A", "T603X2A", "T604X2A", "T608X2A", "T6092XA",
    "T6102XA", "T6112XA", "T61772A", "T61782A", "T618X2A", "T6192XA", "T620X2A", "T621X2A",
    "T622X2A", "T628X2A", "T6292XA", "T63002A", "T63012A", "T63022A", "T63032A", "T63042A",
    "T63062A", "T63072A", "T63082A", "T63092A", "T63112A", "T63122A", "T63192A", "T632X2A",
    "T63302A", "T63312A", "T63322A", "T63332A", "T63392A", "T63412A", "T63422A", "T63432A",
    "T63442A", "T63452A", "T63462A", "T63482A", "T63512A", "T63592A", "T63612A", "T63622A",
    "T63632A", "T63692A", "T63712A", "T63792A", "T63812A", "T63822A", "T63832A", "T63892A",
    "T6392XA", "T6402XA", "T6482XA", "T650X2A", "T651X2A", "T65212A", "T65222A", "T65292A",
    "T653X2A", "T654X2A", "T655X2A", "T656X2A", "T65812A", "T65822A", "T65832A", "T65892A",
    "T6592XA", "T71112A", "T71122A", "T71132A", "T71152A", "T71162A", "T71192A", "T71222A",
    "T71232A", "X710XXA", "X711XXA", "X712XXA", "X713XXA", "X718XXA", "X719XXA", "X72XXXA",
    "X730XXA", "X731XXA", "X732XXA", "X738XXA", "X739XXA", "X7401XA", "X7402XA", "X7409XA",
    "X748XXA", "X749XXA", "X75XXXA", "X76XXXA", "X770XXA", "X771XXA", "X772XXA", "X773XXA",
    "X778XXA", "X779XXA", "X780XXA", "X781XXA", "X782XXA", "X788XXA", "X789XXA", "X79XXXA",
    "X80XXXA", "X810XXA", "X811XXA", "X818XXA", "X820XXA", "X821XXA", "X822XXA", "X828XXA",
    "X830XXA", "X831XXA", "X832XXA", "X838XXA",
];

const EDIT_6_CODES: &[&str] = &[
    "H353210", "H353211", "H353212", "H353213", "H353220", "H353221", "H353222", "H353223",
    "H353230", "H353231", "H353232", "H353233", "H353290", "H353291", "H353292", "H353293",
];

const EDIT_7_CODES: &[&str] = &[
    "P0500", "P0501", "P0502", "P0503", "P0504", "P0505", "P0506", "P0507", "P0508", "P0509",
    "P0510", "P0511", "P0512", "P0513", "P0514", "P0515", "P0516", "P0517", "P0518", "P0519",
    "P052", "P059", "P0700", "P0701", "P0702", "P0703", "P0710", "P0714", "P0715", "P0716",
    "P0717", "P0718", "P0720", "P0721", "P0722", "P0723", "P0724", "P0725", "P0726", "P0730",
    "P0731", "P0732", "P0733", "P0734", "P0735", "P0736", "P0737", "P0738", "P0739", "P080",
    "P081", "P0821", "P0822", "Z3800", "Z3801", "Z381", "Z382", "Z3830", "Z3831", "Z384", "Z385",
    "Z3861", "Z3862", "Z3863", "Z3864", "Z3865", "Z3866", "Z3868", "Z3869", "Z387", "Z388",
];

const EDIT_8_CODES: &[&str] = &[
    "Q894",
];

const EDIT_9_CODES: &[&str] = &[
    "K551", "K558", "K559", "P040", "P0411", "P0412", "P0413", "P0414", "P0415", "P0416", "P0417",
    "P0418", "P0419", "P041A", "P042", "P043", "P0440", "P0441", "P0442", "P0449", "P045", "P046",
    "P0481", "P0489", "P049", "P930", "P938", "P961", "P962", "Q390", "Q391", "Q392", "Q393",
    "Q394", "Q6410", "Q6411", "Q6412", "Q6419", "Q790", "Q791", "Q792", "Q793", "Q794", "Q7951",
];

const EDIT_10_CODES: &[&str] = &[
    "P270", "P271", "P278", "P279",
];

const EDIT_11_CODES: &[&str] = &[
    "F3481",
];

const EDIT_12_CODES: &[&str] = &[
    "E700", "E701", "E7020", "E7021", "E7029", "E7030", "E70310", "E70311", "E70318", "E70319",
    "E70320", "E70321", "E70328", "E70329", "E70330", "E70331", "E70338", "E70339", "E7039",
    "E7040", "E7041", "E7049", "E705", "E7081", "E7089", "E709", "E710", "E71110", "E71111",
    "E71118", "E71120", "E71121", "E71128", "E7119", "E712", "E7130", "E71310", "E71311", "E71312",
    "E71313", "E71314", "E71318", "E7132", "E7139", "E7142", "E7150", "E71510", "E71511", "E71518",
    "E71520", "E71521", "E71522", "E71528", "E71529", "E7153", "E71540", "E71541", "E71542",
    "E71548", "E7200", "E7201", "E7202", "E7203", "E7204", "E7209", "E7210", "E7211", "E7212",
    "E7219", "E7220", "E7221", "E7222", "E7223", "E7229", "E723", "E724", "E7250", "E7251",
    "E7252", "E7253", "E7259", "E7281", "E7289", "E729", "E7420", "E7421", "E7429", "E744",
    "E74810", "E74818", "E74819", "E7489", "E749", "E771", "E8840", "E8841", "E8842", "E8843",
    "E8849", "H49811", "H49812", "H49813", "H49819",
];

const EDIT_13_CODES: &[&str] = &[
    "D66", "D67",
];

const EDIT_14_CODES: &[&str] = &[
    "E10641", "E1011", "E1010",
];

const EDIT_15_CODES: &[&str] = &[
    "E1022", "E1029", "E1021", "E1052", "E1059", "E1051", "E1041", "E1049", "E1044", "E1040",
    "E1043", "E1042", "E10610", "E10621", "E10620", "E10622", "E10618", "E10628", "E10638",
    "E10630", "E1069", "E103591", "E103412", "E103593", "E103559", "E103291", "E103552", "E103549",
    "E103393", "E103542", "E103539", "E10311", "E103219", "E103391", "E103532", "E103529",
    "E103531", "E103533", "E103392", "E103541", "E103543", "E103399", "E103551", "E10319",
    "E103553", "E103411", "E103292", "E103592", "E103413", "E103599", "E103523", "E103213",
    "E103319", "E103522", "E103521", "E103313", "E103519", "E103513", "E103212", "E103312",
    "E103512", "E103511", "E103311", "E103499", "E103211", "E103493", "E103492", "E1039",
    "E103299", "E103491", "E1037X9", "E1037X3", "E1037X2", "E1037X1", "E103293", "E103419",
    "E1036",
];

const EDIT_16_CODES: &[&str] = &[
    "E108", "E1065", "E10649", "E109",
];

const EDITS: &[AgeSexEdit] = &[
    AgeSexEdit {
        condition: EditCondition::AgeBelow(18),
        codes: EDIT_1_CODES,
        outcome: EditOutcome::Remap(&["HHS_HCC009"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(18),
        codes: EDIT_2_CODES,
        outcome: EditOutcome::Remap(&["HHS_HCC161_1"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(2),
        codes: EDIT_3_CODES,
        outcome: EditOutcome::Remap(&["HHS_HCC042"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(50),
        codes: EDIT_4_CODES,
        outcome: EditOutcome::Remap(&["HHS_HCC011"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(2),
        codes: EDIT_5_CODES,
        outcome: EditOutcome::Drop,
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(21),
        codes: EDIT_6_CODES,
        outcome: EditOutcome::Drop,
    },
    AgeSexEdit {
        condition: EditCondition::AgeAtLeast(1),
        codes: EDIT_7_CODES,
        outcome: EditOutcome::Drop,
    },
    AgeSexEdit {
        condition: EditCondition::AgeAtLeast(1),
        codes: EDIT_8_CODES,
        outcome: EditOutcome::Remap(&["HHS_HCC097"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeAtLeast(2),
        codes: EDIT_9_CODES,
        outcome: EditOutcome::Drop,
    },
    AgeSexEdit {
        condition: EditCondition::AgeAtLeast(2),
        codes: EDIT_10_CODES,
        outcome: EditOutcome::Remap(&["HHS_HCC162"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeOutside { below: 6, above: 18 },
        codes: EDIT_11_CODES,
        outcome: EditOutcome::Drop,
    },
    AgeSexEdit {
        condition: EditCondition::AgeAtLeast(21),
        codes: EDIT_12_CODES,
        outcome: EditOutcome::Drop,
    },
    AgeSexEdit {
        condition: EditCondition::Sex(Sex::Female),
        codes: EDIT_13_CODES,
        outcome: EditOutcome::Remap(&["HHS_HCC075"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(21),
        codes: EDIT_14_CODES,
        outcome: EditOutcome::Remap(&["HHS_HCC019"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(21),
        codes: EDIT_15_CODES,
        outcome: EditOutcome::Remap(&["HHS_HCC020"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(21),
        codes: EDIT_16_CODES,
        outcome: EditOutcome::Remap(&["HHS_HCC021"]),
    },
];

const BANDS: &[AgeBand] = &[
    AgeBand::between(2, 4, "2_4"),
    AgeBand::between(5, 9, "5_9"),
    AgeBand::between(10, 14, "10_14"),
    AgeBand::between(15, 20, "15_20"),
    AgeBand::between(21, 24, "21_24"),
    AgeBand::between(25, 29, "25_29"),
    AgeBand::between(30, 34, "30_34"),
    AgeBand::between(35, 39, "35_39"),
    AgeBand::between(40, 44, "40_44"),
    AgeBand::between(45, 49, "45_49"),
    AgeBand::between(50, 54, "50_54"),
    AgeBand::between(55, 59, "55_59"),
    AgeBand::at_least(60, "60_GT"),
];

const CLASSIFIER: DemographicClassifier = DemographicClassifier {
    bands: BANDS,
    new_enrollee_bands: None,
    naming: BandNaming::SexAgeLast,
    interactions: &[],
};

const SEVERITY_5_HCCS: &[&str] = &[
    "HHS_HCC008", "HHS_HCC018", "HHS_HCC034", "HHS_HCC041", "HHS_HCC042", "HHS_HCC125",
    "HHS_HCC128", "HHS_HCC129", "HHS_HCC130", "HHS_HCC137", "HHS_HCC158", "HHS_HCC183",
    "HHS_HCC184", "HHS_HCC251",
];

const SEVERITY_4_HCCS: &[&str] = &[
    "HHS_HCC002", "HHS_HCC009", "HHS_HCC026", "HHS_HCC030", "HHS_HCC035_1", "HHS_HCC035_2",
    "HHS_HCC064", "HHS_HCC067", "HHS_HCC068", "HHS_HCC073", "HHS_HCC106", "HHS_HCC107",
    "HHS_HCC111", "HHS_HCC112", "HHS_HCC115", "HHS_HCC122", "HHS_HCC126", "HHS_HCC127",
    "HHS_HCC131", "HHS_HCC135", "HHS_HCC138", "HHS_HCC145", "HHS_HCC146", "HHS_HCC154",
    "HHS_HCC156", "HHS_HCC163", "HHS_HCC187", "HHS_HCC253",
];

const SEVERITY_3_HCCS: &[&str] = &[
    "HHS_HCC001", "HHS_HCC003", "HHS_HCC006", "HHS_HCC010", "HHS_HCC011", "HHS_HCC012",
    "HHS_HCC027", "HHS_HCC045", "HHS_HCC054", "HHS_HCC055", "HHS_HCC061", "HHS_HCC063",
    "HHS_HCC066", "HHS_HCC074", "HHS_HCC075", "HHS_HCC081", "HHS_HCC082", "HHS_HCC083",
    "HHS_HCC084", "HHS_HCC096", "HHS_HCC108", "HHS_HCC109", "HHS_HCC110", "HHS_HCC113",
    "HHS_HCC114", "HHS_HCC117", "HHS_HCC119", "HHS_HCC121", "HHS_HCC132", "HHS_HCC139",
    "HHS_HCC142", "HHS_HCC149", "HHS_HCC150", "HHS_HCC159", "HHS_HCC218", "HHS_HCC223",
    "HHS_HCC226", "HHS_HCC228",
];

const SEVERITY_2_HCCS: &[&str] = &[
    "HHS_HCC004", "HHS_HCC013", "HHS_HCC019", "HHS_HCC020", "HHS_HCC021", "HHS_HCC023",
    "HHS_HCC028", "HHS_HCC029", "HHS_HCC036", "HHS_HCC046", "HHS_HCC047", "HHS_HCC048",
    "HHS_HCC056", "HHS_HCC057", "HHS_HCC062", "HHS_HCC069", "HHS_HCC070", "HHS_HCC097",
    "HHS_HCC120", "HHS_HCC151", "HHS_HCC153", "HHS_HCC160", "HHS_HCC161_1", "HHS_HCC162",
    "HHS_HCC188", "HHS_HCC217", "HHS_HCC219",
];

const SEVERITY_1_HCCS: &[&str] = &[
    "HHS_HCC037_1", "HHS_HCC037_2", "HHS_HCC071", "HHS_HCC102", "HHS_HCC103", "HHS_HCC118",
    "HHS_HCC161_2", "HHS_HCC234", "HHS_HCC254",
];

const SEVERE_ILLNESS_HCCS: &[&str] = &[
    "HHS_HCC002", "HHS_HCC003", "HHS_HCC004", "HHS_HCC006", "HHS_HCC018", "HHS_HCC023",
    "HHS_HCC034", "HHS_HCC041", "HHS_HCC042", "HHS_HCC096", "HHS_HCC121", "HHS_HCC122",
    "HHS_HCC125", "HHS_HCC126", "HHS_HCC127", "HHS_HCC128", "HHS_HCC129", "HHS_HCC135",
    "HHS_HCC145", "HHS_HCC156", "HHS_HCC158", "HHS_HCC163", "HHS_HCC183", "HHS_HCC218",
    "HHS_HCC223", "HHS_HCC251",
];

const TRANSPLANT_HCCS: &[&str] = &[
    "HHS_HCC018", "HHS_HCC034", "HHS_HCC041", "HHS_HCC128", "HHS_HCC129", "HHS_HCC158",
    "HHS_HCC183", "HHS_HCC251",
];

const LIVER: Condition = Condition::AnyOf(&["HHS_HCC034", "HHS_HCC035_1", "HHS_HCC035_2", "HHS_HCC036", "HHS_HCC037_1"]);
const KIDNEY: Condition = Condition::AnyOf(&["HHS_HCC183", "HHS_HCC184", "HHS_HCC187", "HHS_HCC188"]);
const INTESTINE: Condition = Condition::AnyOf(&["HHS_HCC041", "HHS_HCC048"]);
const DIABETES: Condition = Condition::AnyOf(&["HHS_HCC018", "HHS_HCC019", "HHS_HCC020", "HHS_HCC021"]);
const AUTOIMMUNE: Condition = Condition::AnyOf(&["HHS_HCC056", "HHS_HCC057"]);
const LUNG: Condition = Condition::AnyOf(&["HHS_HCC158", "HHS_HCC159"]);
const SEVERE_ILLNESS: Condition = Condition::AnyOf(SEVERE_ILLNESS_HCCS);
const TRANSPLANT: Condition = Condition::AnyOf(TRANSPLANT_HCCS);

const ADULT_RULES: &[InteractionRule] = &[
    InteractionRule::reporting("RXC_01_x_HCC001", &[Condition::Has("RXC_01"), Condition::Has("HHS_HCC001")]),
    InteractionRule::reporting("RXC_02_x_HCC037_1_036_035_2_035_1_034", &[Condition::Has("RXC_02"), LIVER]),
    InteractionRule::reporting("RXC_03_x_HCC142", &[Condition::Has("RXC_03"), Condition::Has("HHS_HCC142")]),
    InteractionRule::reporting("RXC_04_x_HCC184_183_187_188", &[Condition::Has("RXC_04"), KIDNEY]),
    InteractionRule::reporting("RXC_05_x_HCC048_041", &[Condition::Has("RXC_05"), INTESTINE]),
    InteractionRule::reporting("RXC_06_x_HCC018_019_020_021", &[Condition::Has("RXC_06"), DIABETES]),
    InteractionRule::reporting("RXC_07_x_HCC018_019_020_021", &[Condition::Has("RXC_07"), DIABETES]),
    InteractionRule::reporting("RXC_08_x_HCC118", &[Condition::Has("RXC_08"), Condition::Has("HHS_HCC118")]),
    InteractionRule::reporting(
        "RXC_09_x_HCC056_057_and_048_041",
        &[Condition::Has("RXC_09"), AUTOIMMUNE, INTESTINE],
    ),
    InteractionRule::reporting("RXC_09_x_HCC056", &[Condition::Has("RXC_09"), Condition::Has("HHS_HCC056")]),
    InteractionRule::reporting("RXC_09_x_HCC057", &[Condition::Has("RXC_09"), Condition::Has("HHS_HCC057")]),
    InteractionRule::reporting("RXC_09_x_HCC048_041", &[Condition::Has("RXC_09"), INTESTINE]),
    InteractionRule::reporting("RXC_10_x_HCC159_158", &[Condition::Has("RXC_10"), LUNG]),
];

const ADULT_SEVERE_BUCKETS: &[CountBucket] = &[
    CountBucket::numbered(1, 9, "SEVERE_HCC_COUNT"),
    CountBucket::at_least(10, "SEVERE_HCC_COUNT10PLUS"),
];

const ADULT_TRANSPLANT_BUCKETS: &[CountBucket] = &[
    CountBucket::numbered(4, 7, "TRANSPLANT_HCC_COUNT"),
    CountBucket::at_least(8, "TRANSPLANT_HCC_COUNT8PLUS"),
];

const CHILD_SEVERE_BUCKETS: &[CountBucket] = &[
    CountBucket::numbered(1, 5, "SEVERE_HCC_COUNT"),
    CountBucket::between(6, 7, "SEVERE_HCC_COUNT6_7"),
    CountBucket::at_least(8, "SEVERE_HCC_COUNT8PLUS"),
];

const CHILD_TRANSPLANT_BUCKETS: &[CountBucket] = &[CountBucket::at_least(4, "TRANSPLANT_HCC_COUNT4PLUS")];

const ADULT_COUNTS: &[CountRule] = &[
    CountRule {
        when: &[SEVERE_ILLNESS],
        buckets: ADULT_SEVERE_BUCKETS,
    },
    CountRule {
        when: &[TRANSPLANT],
        buckets: ADULT_TRANSPLANT_BUCKETS,
    },
];

const CHILD_COUNTS: &[CountRule] = &[
    CountRule {
        when: &[SEVERE_ILLNESS],
        buckets: CHILD_SEVERE_BUCKETS,
    },
    CountRule {
        when: &[TRANSPLANT],
        buckets: CHILD_TRANSPLANT_BUCKETS,
    },
];

/// Prescription categories and HHS_HCC022 do not count toward payment counts.
const COUNT_EXCLUSIONS: CountExclusions = CountExclusions {
    prefixes: &["RXC"],
    names: &["HHS_HCC022"],
};

const ADULT_INTERACTIONS: InteractionEngine = InteractionEngine {
    rules: ADULT_RULES,
    counts: ADULT_COUNTS,
    exclusions: COUNT_EXCLUSIONS,
};

const CHILD_INTERACTIONS: InteractionEngine = InteractionEngine {
    rules: &[],
    counts: CHILD_COUNTS,
    exclusions: COUNT_EXCLUSIONS,
};

/// Enrollment duration categories exist for one through six months.
const MAX_SHORT_ENROLLMENT_MONTHS: u32 = 6;

/// First year HHS_HCC071 counts as severity 2 for infants.
const HCC071_SEVERITY_2_FROM: u16 = 2025;

const MATURITY_LEVELS: &[(&str, &[&str])] = &[
    ("Extremely_Immature", &["HHS_HCC242", "HHS_HCC243", "HHS_HCC244"]),
    ("Immature", &["HHS_HCC245", "HHS_HCC246"]),
    ("Premature_Multiples", &["HHS_HCC247", "HHS_HCC248"]),
    ("Term", &["HHS_HCC249"]),
];

const SEVERITY_LEVELS: &[(&str, &[&str])] = &[
    ("Severity5", SEVERITY_5_HCCS),
    ("Severity4", SEVERITY_4_HCCS),
    ("Severity3", SEVERITY_3_HCCS),
    ("Severity2", SEVERITY_2_HCCS),
    ("Severity1", SEVERITY_1_HCCS),
];

/// Cost-sharing reduction multiplier by payment year and indicator.
fn csr_factor(year: u16, indicator: Option<u8>) -> Option<f64> {
    if !(2019..=2025).contains(&year) {
        return None;
    }
    Some(match indicator {
        Some(2) => 1.07,
        Some(3) => 1.12,
        Some(4) => 1.15,
        _ => 1.00,
    })
}

/// Maturity level of an infant from its birth categories.
fn infant_maturity(age: u32, diseases: &[String]) -> &'static str {
    if age == 1 {
        return "Age1";
    }
    MATURITY_LEVELS
        .iter()
        .find(|(_, hccs)| hccs.iter().any(|&hcc| diseases.iter().any(|d| d == hcc)))
        .map_or("Age1", |(level, _)| *level)
}

/// Severity level of an infant: the highest level any category reaches.
fn infant_severity(year: u16, diseases: &[String]) -> &'static str {
    let has = |name: &str| diseases.iter().any(|d| d == name);
    if year >= HCC071_SEVERITY_2_FROM
        && has("HHS_HCC071")
        && !SEVERITY_LEVELS[..3].iter().any(|(_, hccs)| hccs.iter().any(|&hcc| has(hcc)))
    {
        return "Severity2";
    }
    SEVERITY_LEVELS
        .iter()
        .find(|(_, hccs)| hccs.iter().any(|&hcc| has(hcc)))
        .map_or("Severity1", |(level, _)| *level)
}

/// HHS-HCC V07 rules for one benefit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommercialV07Rules {
    year: u16,
}

impl CommercialV07Rules {
    /// Rules for a benefit year.
    pub fn new(year: u16) -> Self {
        Self { year }
    }

    fn enrollment_duration(&self, categories: &CategorySet, beneficiary: &Beneficiary) -> Option<String> {
        let months = beneficiary.commercial()?.enrollment_months;
        let count = ADULT_INTERACTIONS.qualifying_count(&Membership::new(categories));
        (count > 0 && (1..=MAX_SHORT_ENROLLMENT_MONTHS).contains(&months)).then(|| format!("HCC_ED{months}"))
    }
}

impl ModelRules for CommercialV07Rules {
    fn key(&self) -> ModelKey {
        ModelKey::new(ModelVersion::CommercialV07, self.year)
    }

    fn edits(&self) -> &'static [AgeSexEdit] {
        EDITS
    }

    fn classify_demographics(&self, beneficiary: &Beneficiary) -> Result<Vec<String>, InputError> {
        if beneficiary.segment() == Some(AgeSegment::Infant) {
            return Ok(match beneficiary.sex {
                Sex::Male => vec![format!("Age{}_Male", beneficiary.age)],
                Sex::Female => Vec::new(),
            });
        }
        CLASSIFIER.classify(beneficiary)
    }

    fn admits_category(&self, name: &str, beneficiary: &Beneficiary) -> bool {
        beneficiary.segment() != Some(AgeSegment::Child) || !name.contains("RX")
    }

    fn group_segment(&self, beneficiary: &Beneficiary) -> &'static str {
        beneficiary.segment().unwrap_or(AgeSegment::Adult).code()
    }

    fn resolve_interactions(&self, categories: &CategorySet, beneficiary: &Beneficiary) -> Vec<DerivedCategory> {
        match beneficiary.segment() {
            Some(AgeSegment::Child) => CHILD_INTERACTIONS.derive(categories, beneficiary),
            Some(AgeSegment::Infant) => Vec::new(),
            Some(AgeSegment::Adult) | None => {
                let mut derived = ADULT_INTERACTIONS.derive(categories, beneficiary);
                if let Some(name) = self.enrollment_duration(categories, beneficiary) {
                    if !categories.contains(&name) {
                        derived.push(DerivedCategory::plain(name));
                    }
                }
                derived
            }
        }
    }

    fn substitute_categories(
        &self,
        beneficiary: &Beneficiary,
        demographic: &[String],
        diseases: &[String],
    ) -> Option<Vec<String>> {
        if beneficiary.segment() != Some(AgeSegment::Infant) {
            return None;
        }

        let maturity = infant_maturity(beneficiary.age, diseases);
        let severity = infant_severity(self.year, diseases);

        let mut categories = demographic.to_vec();
        categories.push(format!("{maturity}_x_{severity}"));

        if beneficiary.age == 0 && beneficiary.sex == Sex::Male && maturity == "Age1" {
            categories.retain(|name| name != "Age0_Male");
            categories.push("Age1_Male".to_string());
        }

        tracing::debug!(maturity, severity, "infant categories resolved");
        Some(categories)
    }

    fn adjustment(&self, beneficiary: &Beneficiary) -> Adjustment {
        let indicator = beneficiary.commercial().and_then(|c| c.csr_indicator);
        let factor = csr_factor(self.year, indicator).unwrap_or_else(|| {
            tracing::warn!(year = self.year, "no cost-sharing reduction factors, using 1.0");
            1.0
        });
        Adjustment::identity().multiply(FactorKind::CostSharingReduction, factor, 3)
    }
}
